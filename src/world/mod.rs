mod camera;
mod door;
mod map;
mod pool;
mod procedural;
mod scene;
mod texture;

pub use camera::Camera;
pub use door::{DOOR_SPEED, Door, DoorAxis};
pub use map::{MAX_DOORS, SOLID, Tile, WorldMap};
pub use pool::Pool;
pub use procedural::{BRICK, METAL, ORB, STONE, WOOD};
pub use scene::{
    Light, MAX_LIGHTS, MAX_PARTICLES, MAX_SPRITES, Particle, Scene, Sprite,
};
pub use texture::{
    MAGENTA, MAX_TEXTURES, TEXTURE_SIZE, Texture, TextureBank, TextureError, TextureId,
};
