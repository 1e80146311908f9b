mod controls;
mod details;
mod fps;
mod panels;
mod timeline;
