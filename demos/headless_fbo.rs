//! Run the FBO simulation without a window and inspect the result
//!
//! Builds a small seeded field, runs a few feedback steps that spin it a
//! quarter turn about Y, reads the positions back and fails if they are not
//! where the rotation should have put them.
//!
//! Run with: cargo run --example headless_fbo

use fbo_core::PositionData;
use fbo_render::context::HeadlessContext;
use fbo_render::pipeline::{SimulationPipeline, SimulationUniforms};

const WIDTH: u32 = 64;
const HEIGHT: u32 = 64;
const STEPS: u32 = 4;
/// Accepted drift after the quarter turn, in world units
const TOLERANCE: f32 = 1e-2;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data = PositionData::random_seeded(WIDTH, HEIGHT, 256.0, Some(7))?;
    let context = pollster::block_on(HeadlessContext::new())?;

    let mut simulation =
        SimulationPipeline::new(&context.device, &context.queue, &context.adapter, &data)?;
    simulation.set_feedback(true);

    let step_angle = std::f32::consts::FRAC_PI_2 / STEPS as f32;
    for i in 0..STEPS {
        simulation.update_uniforms(
            &context.queue,
            &SimulationUniforms {
                time: i as f32,
                delta: 1.0,
                angle: step_angle,
                _padding: 0.0,
            },
        );
        let mut encoder = context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Headless Step Encoder"),
        });
        simulation.update(&mut encoder);
        context.queue.submit(std::iter::once(encoder.finish()));
    }

    let positions = simulation.read_positions(&context.device, &context.queue)?;
    log::info!("Read back {} particles after {} steps", positions.len(), STEPS);

    // A quarter turn about Y maps (x, y, z) to (z, y, -x)
    let max_error = data
        .texels()
        .iter()
        .zip(&positions)
        .map(|(before, after)| {
            let expected = [before[2], before[1], -before[0]];
            (0..3)
                .map(|c| (expected[c] - after[c]).abs())
                .fold(0.0f32, f32::max)
        })
        .fold(0.0f32, f32::max);
    log::info!("Largest deviation from a quarter turn: {:.5}", max_error);
    if max_error > TOLERANCE {
        return Err(format!(
            "FBO output deviates from a quarter turn by {} (tolerance {})",
            max_error, TOLERANCE
        )
        .into());
    }

    let (min, max) = data.bounds();
    log::info!(
        "Initial bounds: ({:.1}, {:.1}, {:.1}) to ({:.1}, {:.1}, {:.1})",
        min.x, min.y, min.z, max.x, max.y, max.z
    );

    Ok(())
}
