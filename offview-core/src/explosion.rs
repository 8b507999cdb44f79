/// Reversible radial "explode" displacement of a mesh's vertices
///
/// ```text
/// Uninitialized --initialize--> Initialized --set_factor(f > 0)--> Exploded(f)
///                                    ^                                 |
///                                    +------------- reset -------------+
/// ```
///
/// The snapshot of original positions is the immutable base layer. Current
/// positions, normals and face centroids are derived from it and the factor,
/// and are recomputed on every transition. None of these operations fail;
/// calls that make no sense in the current state are logged and ignored.
use nalgebra::{Point3, Vector3};

use crate::mesh::Mesh;

/// Vertices closer than this to the explosion origin move along [`fallback_direction`].
pub const ORIGIN_EPSILON: f32 = 1e-4;

/// Displacement direction for vertices sitting on the explosion origin.
pub fn fallback_direction() -> Vector3<f32> {
    Vector3::y()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExplosionState {
    Uninitialized,
    Initialized,
    Exploded(f32),
}

/// Commands a front end sends to drive the explosion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExplodeCommand {
    Initialize,
    SetFactor(f32),
    Reset,
    Release,
}

#[derive(Debug, Clone)]
struct Snapshot {
    positions: Vec<Point3<f32>>,
    origin: Point3<f32>,
    /// Unit displacement direction per vertex.
    directions: Vec<Vector3<f32>>,
}

impl Snapshot {
    fn capture(positions: Vec<Point3<f32>>) -> Self {
        let origin = match positions.len() {
            0 => Point3::origin(),
            n => Point3::from(positions.iter().map(|p| p.coords).sum::<Vector3<f32>>() / n as f32),
        };
        let directions = positions
            .iter()
            .map(|p| {
                let offset = p - origin;
                let distance = offset.norm();
                if distance > ORIGIN_EPSILON {
                    offset / distance
                } else {
                    fallback_direction()
                }
            })
            .collect();

        Self {
            positions,
            origin,
            directions,
        }
    }
}

/// Explosion bookkeeping owned by a [`Mesh`].
#[derive(Debug, Clone, Default)]
pub struct Explosion {
    snapshot: Option<Snapshot>,
    factor: f32,
}

impl Explosion {
    pub fn state(&self) -> ExplosionState {
        match (&self.snapshot, self.factor) {
            (None, _) => ExplosionState::Uninitialized,
            (Some(_), f) if f > 0.0 => ExplosionState::Exploded(f),
            (Some(_), _) => ExplosionState::Initialized,
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Unweighted mean of the original positions, once initialized.
    pub fn origin(&self) -> Option<Point3<f32>> {
        self.snapshot.as_ref().map(|s| s.origin)
    }

    /// Original positions, once initialized.
    pub fn baseline(&self) -> Option<&[Point3<f32>]> {
        self.snapshot.as_ref().map(|s| s.positions.as_slice())
    }
}

impl Mesh {
    pub fn explosion(&self) -> &Explosion {
        &self.explosion
    }

    pub fn explosion_state(&self) -> ExplosionState {
        self.explosion.state()
    }

    /// Capture the current positions as the baseline. Does nothing if already captured.
    pub fn initialize_explosion(&mut self) {
        if self.explosion.snapshot.is_some() {
            return;
        }
        let snapshot = Snapshot::capture(self.model.positions().collect());
        tracing::debug!(
            "{}: explosion initialized around {:?}",
            self.id(),
            snapshot.origin
        );
        self.explosion = Explosion {
            snapshot: Some(snapshot),
            factor: 0.0,
        };
    }

    /// Move every vertex `factor` units away from the origin along its baseline direction.
    ///
    /// The first call on an uninitialized mesh only takes the snapshot and
    /// leaves positions untouched. `factor` is clamped to `[0, 1]`; non-finite
    /// values are ignored.
    pub fn set_explode_factor(&mut self, factor: f32) {
        if !factor.is_finite() {
            tracing::warn!("{}: ignoring non-finite explode factor {}", self.id(), factor);
            return;
        }
        let Some(snapshot) = self.explosion.snapshot.as_ref() else {
            self.initialize_explosion();
            return;
        };

        let clamped = factor.clamp(0.0, 1.0);
        if clamped != factor {
            tracing::debug!("{}: explode factor {} clamped to {}", self.id(), factor, clamped);
        }

        for ((vertex, base), dir) in self
            .model
            .vertices_mut()
            .iter_mut()
            .zip(&snapshot.positions)
            .zip(&snapshot.directions)
        {
            vertex.position = base + dir * clamped;
        }
        self.explosion.factor = clamped;
        self.refresh_derived();
    }

    /// Put every vertex back at its baseline position. Does nothing if uninitialized.
    pub fn reset_explosion(&mut self) {
        let Some(snapshot) = self.explosion.snapshot.as_ref() else {
            tracing::debug!("{}: reset ignored, explosion not initialized", self.id());
            return;
        };

        for (vertex, base) in self.model.vertices_mut().iter_mut().zip(&snapshot.positions) {
            vertex.position = *base;
        }
        self.explosion.factor = 0.0;
        self.refresh_derived();
    }

    /// Drop the snapshot. An exploded mesh is reset first so the next
    /// initialization never captures displaced positions.
    pub fn release_explosion(&mut self) {
        if let ExplosionState::Exploded(factor) = self.explosion.state() {
            tracing::warn!(
                "{}: releasing explosion at factor {}, resetting first",
                self.id(),
                factor
            );
            self.reset_explosion();
        }
        if self.explosion.snapshot.take().is_some() {
            tracing::debug!("{}: explosion released", self.id());
        }
        self.explosion.factor = 0.0;
    }

    pub fn apply(&mut self, command: ExplodeCommand) {
        match command {
            ExplodeCommand::Initialize => self.initialize_explosion(),
            ExplodeCommand::SetFactor(f) => self.set_explode_factor(f),
            ExplodeCommand::Reset => self.reset_explosion(),
            ExplodeCommand::Release => self.release_explosion(),
        }
    }
}

/// Apply a command to an optional mesh. A missing mesh is a no-op.
pub fn dispatch(mesh: Option<&mut Mesh>, command: ExplodeCommand) {
    match mesh {
        Some(mesh) => mesh.apply(command),
        None => tracing::debug!("{:?} ignored: no mesh loaded", command),
    }
}
