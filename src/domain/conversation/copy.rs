//! User-facing message texts.

use chrono::NaiveDate;

pub const REJECTION: &str = "Sorry, you are not allowed to use this bot.";

pub const CHOOSE_METHOD: &str = "How would you like to add the product?";
pub const BUTTON_MANUAL: &str = "Add manually";
pub const BUTTON_PHOTO: &str = "Add with photos";

pub const ASK_NAME: &str = "Please enter the product name:";
pub const ASK_BARCODE_IMAGE: &str = "Please send me a picture of the product's barcode.";
pub const ASK_EXPIRATION_IMAGE: &str = "Please send a picture of the expiration date.";

pub const NAME_REGISTERED: &str =
    "Product registered. Please enter the expiration date in the format MM/YYYY or DD/MM/YYYY:";

pub const BARCODE_UNREADABLE: &str =
    "The barcode could not be read. Please enter the product name manually.";
pub const BARCODE_UNKNOWN: &str =
    "No information was found for this barcode. Please enter the product name manually.";
pub const EXPIRATION_UNREADABLE: &str =
    "The expiration date could not be read. Please enter it manually in the format DD/MM/YYYY or MM/YYYY.";
pub const INVALID_DATE: &str =
    "The date entered is not valid. Make sure to use the format MM/YYYY or DD/MM/YYYY.";

pub const CALENDAR_FAILED: &str = "There was an error creating the reminder in the calendar.";
pub const IMAGE_FAILED: &str = "There was an error processing the image.";
pub const GENERIC_FAILURE: &str = "Something went wrong. Send /start to try again.";

pub fn product_detected(summary: &str) -> String {
    format!("Product detected: {}.", summary)
}

pub fn date_detected(date: &str) -> String {
    format!("Expiration date detected: {}. Creating calendar event...", date)
}

pub fn date_registered(date: &str) -> String {
    format!("Expiration date registered: {}. Creating calendar event...", date)
}

pub fn not_a_calendar_date(date: &str) -> String {
    format!("{} is not a real calendar date, so no reminder was created.", date)
}

pub fn reminder_created(product: &str, on: NaiveDate) -> String {
    format!(
        "Reminder to consume {} created for {}.",
        product,
        on.format("%a %b %d %Y")
    )
}
