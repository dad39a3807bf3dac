pub mod attempt_reader;
pub mod matrix_writer;
