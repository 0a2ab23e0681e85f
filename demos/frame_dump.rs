//! Frame dump: Render a handful of plasma frames straight to stdout.
//!
//! No terminal session, no loop; useful for eyeballing the serialized
//! output or piping it through `cat -v`.

use phosphor::render::encode_frame;
use phosphor::scene::{Mode, Overrides, Scene};
use phosphor::{FrameBuffer, OutputBuffer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;

fn main() -> std::io::Result<()> {
    let mut rng = StdRng::from_entropy();
    let (mut scene, config) = Mode::Plasma.build(&Overrides::default(), &mut rng);

    let mut frame = FrameBuffer::new(config.width, config.height);
    let mut out = OutputBuffer::new();
    let mut stdout = std::io::stdout();

    for tick in 0..4u64 {
        frame.clear();
        scene.draw(&mut frame, tick);
        out.clear();
        encode_frame(&frame, &mut out);
        stdout.write_all(out.as_bytes())?;
        scene.advance(&mut rng);
    }
    stdout.flush()
}
