use rfd::{MessageButtons, MessageDialog, MessageLevel};
use winit::window::Window;

use rain::settings::{ACKNOWLEDGMENT_MESSAGE, ACKNOWLEDGMENT_TITLE};

pub fn show_help(text: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title("Digital Rain")
        .set_description(text)
        .set_buttons(MessageButtons::Ok)
        .show();
}

pub fn acknowledge_saved(parent: &Window) {
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(ACKNOWLEDGMENT_TITLE)
        .set_description(ACKNOWLEDGMENT_MESSAGE)
        .set_buttons(MessageButtons::Ok)
        .set_parent(parent)
        .show();
}
