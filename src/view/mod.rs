pub mod page_renderer;
