pub mod region;
pub mod world;

pub use self::region::{Chunk, CompressionScheme, REGION_WIDTH, Region, RegionError, SECTOR_SIZE};
pub use self::world::{
    RegionFileInfo, SaveFormat, UnknownFormatError,
    enumerate_region_files, enumerate_world, region_pos_from_path,
};
