pub mod dispatch;
pub mod event_reader;
pub mod outcome_writer;
