pub mod keyterm_csv;
