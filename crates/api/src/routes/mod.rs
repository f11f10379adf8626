pub mod pages;
pub mod signals;
pub mod webhook;
