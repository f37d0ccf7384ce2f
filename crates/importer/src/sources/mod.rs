pub mod datagolf;
