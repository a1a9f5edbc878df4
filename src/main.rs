use bvh_motion::{load_bvh_from_file, FormatError};

fn main() -> Result<(), FormatError> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: bvh_motion <file.bvh> [frame]");
        std::process::exit(2);
    };
    let frame: usize = match args.next().map(|arg| arg.parse()) {
        None => 0,
        Some(Ok(frame)) => frame,
        Some(Err(_)) => {
            eprintln!("frame must be a non-negative integer");
            std::process::exit(2);
        }
    };

    let mut skeleton = load_bvh_from_file(&path)?;
    print!("{}", skeleton);
    println!(
        "{} frames, {}s per frame ({:.1} fps)",
        skeleton.num_frames(),
        skeleton.frame_time(),
        skeleton.fps()
    );

    if !skeleton.evaluate_at(frame) {
        eprintln!("frame {} is out of range", frame);
        std::process::exit(1);
    }
    println!("frame {}:", frame);
    for joint in skeleton.joints() {
        let (t, r) = (joint.translation, joint.rotation);
        println!(
            "  {:<20} translation ({:.3}, {:.3}, {:.3})  rotation ({:.4}, {:.4}, {:.4})",
            joint.name, t.x, t.y, t.z, r.x, r.y, r.z
        );
    }
    Ok(())
}
