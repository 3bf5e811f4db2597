mod axes;
mod interaction;
mod view;
