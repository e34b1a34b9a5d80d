pub mod detail;
pub mod favorites;
pub mod search;
pub mod settings;
pub mod toasts;

pub use detail::Detail;
pub use search::Search;
pub use settings::Settings;
pub use toasts::Toasts;

use iced::Element;
use iced_native::widget::helpers::text;

pub fn empty<'a, Message>() -> Element<'a, Message> {
    text("").into()
}
