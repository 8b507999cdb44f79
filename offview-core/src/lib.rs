/// offview core library - OFF mesh processing for rendering
///
/// Loads OFF meshes into a polygon-soup model, fan-triangulates them, derives
/// smooth normals, face centroids and view-fitting bounds, and drives a
/// reversible explode effect whose state lives inside the mesh.

pub mod animation;
pub mod bounds;
pub mod config;
pub mod error;
pub mod explosion;
pub mod mesh;
pub mod model;
pub mod normals;
pub mod off;
pub mod transform;
pub mod triangulate;
pub mod view;

// Re-export commonly used types
pub use animation::ExplodeAnimation;
pub use bounds::BoundingInfo;
pub use config::ViewerConfig;
pub use error::{ConfigError, FormatError, LoadError};
pub use explosion::{ExplodeCommand, Explosion, ExplosionState};
pub use mesh::{Mesh, MeshStats};
pub use model::{Extents, Model, ModelId, Polygon, Vertex};
pub use transform::{AxisPreset, Spin, Transform};
pub use view::{model_matrix, render_buffers, RenderBuffers, RenderVertex};
