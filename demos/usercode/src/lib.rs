#![no_std]

pub mod commands;
