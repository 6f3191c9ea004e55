pub mod date_bar;
pub mod header;
pub mod statusbar;
pub mod timings;
