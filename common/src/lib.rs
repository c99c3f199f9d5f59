pub mod assignment;
pub mod feedback;
pub mod identity;
pub mod lifecycle;
pub mod location;
pub mod money;
pub mod order;
pub mod pricing;
pub mod scrap;
pub mod sync;
pub mod wizard;
