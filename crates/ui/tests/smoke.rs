use banter::app::{NewChat, Quit, ToggleSidebar};

#[test]
fn crate_links_and_reports_its_marker() {
    assert_eq!(banter::smoke_marker(), "banter");
}

#[test]
fn shell_actions_stay_constructible_for_keybindings() {
    // These are bound to cmd-n / cmd-b / cmd-q at startup.
    let _ = (NewChat, ToggleSidebar, Quit);
}
