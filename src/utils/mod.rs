pub mod short_code;
