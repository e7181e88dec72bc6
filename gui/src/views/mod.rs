mod board;
mod compose;
mod notice;
