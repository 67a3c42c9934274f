//! Expiry Reminder - conversational product registration with calendar reminders
//!
//! A chat bot walks an authorized user through registering a perishable
//! product, either by typing its name and expiration date or by sending
//! photos of its barcode and date label, and schedules a calendar reminder
//! two days before the product expires.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
