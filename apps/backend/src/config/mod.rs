pub mod db;
pub mod draw;
