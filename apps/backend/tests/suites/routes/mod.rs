mod draw_pool;
mod draw_rounds;
mod health;
mod unavailable;
