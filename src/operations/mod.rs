pub mod form;
pub mod format;
pub mod ledger_view;
pub mod tracker;
