pub mod lead_pages;
pub mod media;
