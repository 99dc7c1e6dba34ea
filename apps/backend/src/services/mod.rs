pub mod draw_orchestrator;
pub mod pool_allocator;
pub mod pool_seed;
