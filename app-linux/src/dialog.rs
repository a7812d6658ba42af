// app-linux/src/dialog.rs
//
// Modal dialog helpers. Each call blocks the GTK main loop (not the
// caller's thread) until the user dismisses the dialog.

use gtk::prelude::*;

/// Show a modal info/error dialog with `title` as primary and `message` as
/// secondary text; returns once dismissed.
pub(crate) fn message_dialog(kind: gtk::MessageType, title: &str, message: &str) {
    let dialog = gtk::MessageDialog::new(
        None::<&gtk::Window>,
        gtk::DialogFlags::empty(),
        kind,
        gtk::ButtonsType::Ok,
        title,
    );
    dialog.set_secondary_text(Some(message));
    dialog.run();
    dialog.close();
}

/// Show a modal yes/no dialog; true means the user confirmed.
pub(crate) fn confirm_dialog(title: &str, message: &str) -> bool {
    let dialog = gtk::MessageDialog::new(
        None::<&gtk::Window>,
        gtk::DialogFlags::empty(),
        gtk::MessageType::Info,
        gtk::ButtonsType::YesNo,
        title,
    );
    dialog.set_secondary_text(Some(message));
    let response = dialog.run();
    dialog.close();
    affirmative(response)
}

/// Only the platform's "yes" response counts as confirmation; cancel,
/// delete-event and every other code map to false.
pub(crate) fn affirmative(response: gtk::ResponseType) -> bool {
    response == gtk::ResponseType::Yes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_confirms() {
        assert!(affirmative(gtk::ResponseType::Yes));
        assert!(!affirmative(gtk::ResponseType::No));
        assert!(!affirmative(gtk::ResponseType::Cancel));
        assert!(!affirmative(gtk::ResponseType::DeleteEvent));
        assert!(!affirmative(gtk::ResponseType::Ok));
    }
}
