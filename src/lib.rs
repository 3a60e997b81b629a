pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod genres;
pub mod i18n;
pub mod locale;
pub mod models;
pub mod pages;
pub mod render;
pub mod sitemap;
pub mod tmdb;
pub mod utils;
pub mod view;
