pub mod actors;
pub mod capabilities;
pub mod collision;
pub mod compute;
pub mod config;
pub mod effects;
pub mod entities;
pub mod error;
pub mod hud;
pub mod input;
pub mod layout;
pub mod npc;
pub mod power_up;
pub mod score;
pub mod simulation;
pub mod trip;
pub mod weather;
