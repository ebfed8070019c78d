//! Mounts the family tree app on the page body.

use family_tree_canvas::{App, init_logging};
use leptos::prelude::*;

fn main() {
	init_logging();
	mount_to_body(App)
}
