pub mod countdown_bar;
pub mod login_form;
pub mod menu;
pub mod quiz_card;
pub mod results;
pub mod table_picker;
