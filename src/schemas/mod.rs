pub mod military;
