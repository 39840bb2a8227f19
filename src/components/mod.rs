pub mod number_field;
