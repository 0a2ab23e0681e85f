//! Smoke test: Exercise the core primitives without touching the terminal.

fn main() {
    println!("Phosphor Smoke Test");
    println!("===================");
    println!();
    println!("Cell size:  {} bytes", std::mem::size_of::<phosphor::Cell>());
    println!("Color size: {} bytes", std::mem::size_of::<phosphor::Color>());
    println!();

    // Compose a frame
    let mut frame = phosphor::FrameBuffer::new(80, 24);
    println!(
        "Frame: {}x{} = {} cells",
        frame.width(),
        frame.height(),
        frame.len()
    );

    // Nearest write wins
    frame.set(2, 2, b'X', Some(phosphor::Color::new(45)), 1.0);
    frame.set(2, 2, b'Y', Some(phosphor::Color::new(201)), 2.0);

    let mut out = phosphor::OutputBuffer::new();
    phosphor::render::encode_frame(&frame, &mut out);
    println!("Encoded frame: {} bytes", out.len());
    println!();

    println!("Core primitives working.");
}
