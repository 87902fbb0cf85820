//! Lightweight particle emitter simulation.
//!
//! Simulation core only: emission, lifetime, velocity integration and
//! curve-driven sizing. The instanced-mesh rendering and shaders live in the
//! renderer collaborator, which reads the live particle buffer each frame.

use crate::animation::Curve;
use crate::scaler::ScalerMetrics;
use crate::types::Range;
use glam::{Vec2, Vec3};
use rand::Rng;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

/// Region new particles spawn from, in emitter-local space.
#[derive(Copy, Clone, Debug)]
pub enum EmitterShape {
    Point,
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
}

/// Static configuration for a particle system.
#[derive(Clone, Debug)]
pub struct EmitterOptions {
    /// Particles spawned per second while playing.
    pub rate: f32,
    pub shape: EmitterShape,
    pub lifetime: Range,
    pub start_speed: Range,
    pub start_size: Range,
    /// Spread of the launch direction around +Y, in radians.
    pub start_angle: Range,
    /// Size multiplier over the particle's normalised age; unset keeps the
    /// start size for the whole lifetime.
    pub size_curve: Option<Arc<Curve>>,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            rate: 10.0,
            shape: EmitterShape::Point,
            lifetime: Range::new(0.5, 1.0),
            start_speed: Range::fixed(1.0),
            start_size: Range::fixed(0.5),
            start_angle: Range::fixed(0.0),
            size_curve: None,
        }
    }
}

/// One live particle.
#[derive(Copy, Clone, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
    pub lifetime: f32,
    pub base_size: f32,
    pub size: f32,
}

/// A pausable particle emitter.
///
/// While paused, existing particles keep ageing out but nothing new spawns.
pub struct ParticleSystem {
    options: EmitterOptions,
    particles: Vec<Particle>,
    playing: bool,
    emit_accumulator: f32,
    /// Pixel density uniform for the point renderer. Shared so the owning
    /// scaler's reposition hook can refresh it without borrowing the system.
    point_scale: Rc<Cell<f32>>,
}

impl ParticleSystem {
    pub fn new(options: EmitterOptions) -> Self {
        Self {
            options,
            particles: Vec::new(),
            playing: false,
            emit_accumulator: 0.0,
            point_scale: Rc::new(Cell::new(1.0)),
        }
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.emit_accumulator = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn point_scale(&self) -> f32 {
        self.point_scale.get()
    }

    /// Shared handle to the point-size uniform, for reposition hooks.
    pub fn point_scale_handle(&self) -> Rc<Cell<f32>> {
        Rc::clone(&self.point_scale)
    }

    /// Syncs the point-size uniform with the scaler's current pixel density.
    pub fn set_point_scale_from(&mut self, metrics: &ScalerMetrics) {
        self.point_scale.set(metrics.pixels_per_reference_unit());
    }

    pub fn update(&mut self, dt: f32) {
        let mut rng = rand::thread_rng();
        self.update_with_rng(dt, &mut rng);
    }

    pub fn update_with_rng<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        for particle in &mut self.particles {
            particle.age += dt;
            particle.position += particle.velocity * dt;

            let life_ratio = (particle.age / particle.lifetime).clamp(0.0, 1.0);
            let multiplier = self
                .options
                .size_curve
                .as_ref()
                .and_then(|curve| curve.evaluate(life_ratio, None))
                .and_then(|value| value.as_scalar())
                .unwrap_or(1.0);
            particle.size = particle.base_size * multiplier;
        }

        self.particles.retain(|p| p.age < p.lifetime);

        if self.playing && dt > 0.0 {
            self.emit_accumulator += self.options.rate * dt;
            while self.emit_accumulator >= 1.0 {
                self.emit_accumulator -= 1.0;
                let particle = self.spawn(rng);
                self.particles.push(particle);
            }
        }
    }

    fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Particle {
        let offset = match self.options.shape {
            EmitterShape::Point => Vec2::ZERO,
            EmitterShape::Rect { width, height } => Vec2::new(
                Range::new(-width * 0.5, width * 0.5).sample(rng),
                Range::new(-height * 0.5, height * 0.5).sample(rng),
            ),
            EmitterShape::Circle { radius } => {
                let angle = Range::new(0.0, std::f32::consts::TAU).sample(rng);
                let r = Range::new(0.0, radius).sample(rng);
                Vec2::new(angle.cos(), angle.sin()) * r
            }
        };

        let spread = self.options.start_angle.sample(rng);
        let angle = Range::new(-spread, spread).sample(rng);
        let speed = self.options.start_speed.sample(rng);
        let velocity = Vec3::new(angle.sin(), angle.cos(), 0.0) * speed;

        let size = self.options.start_size.sample(rng);

        Particle {
            position: offset.extend(0.0),
            velocity,
            age: 0.0,
            lifetime: self.options.lifetime.sample(rng),
            base_size: size,
            size,
        }
    }
}
