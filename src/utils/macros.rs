/// Builds an iced container widget (`Column`/`Row`) from a list of children.
#[macro_export]
macro_rules! stack {
    ($kind:ident;) => (
        iced::widget::$kind::new()
    );
    ($kind:ident; $($x:expr),+ $(,)?) => (
        iced::widget::$kind::with_children(vec![$(iced::Element::from($x)),+])
    );
}

/// Creates a `Column` with the given children.
#[macro_export]
// todo: bug in rust plugin - rename to column
macro_rules! columee {
    ($($x:expr),* $(,)?) => ($crate::stack!(Column; $($x),*));
}

/// Creates a `Row` with the given children.
#[macro_export]
macro_rules! row {
    ($($x:expr),* $(,)?) => ($crate::stack!(Row; $($x),*));
}
