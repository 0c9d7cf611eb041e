//! Cart Item Handlers

pub(crate) mod clear;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod index;
pub(crate) mod update;
