use {
    anyhow::Context,
    clap::Parser,
    image::FrameWriter,
    std::process::ExitCode,
    uvcsnap::*,
    video::{BufferManager, SessionStats, V4l2Device},
};

fn main() -> ExitCode {
    // usage errors exit 1 like every other failure, --help and --version exit 0
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            let _ = error.print();
            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let _guard = base::init_stderr_logger(args.log_level());

    match run(&args) {
        Ok(stats) => {
            log::info!(
                "done, {} frames taken, {} skipped, {} failed",
                stats.frames_taken,
                stats.frames_skipped,
                stats.frames_failed
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            log::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<SessionStats> {
    // everything in args is checked before the device is touched
    let namer = args.file_namer()?;

    let mut manager = BufferManager::new(V4l2Device::new(), args.capture_config());
    manager
        .initialize()
        .with_context(|| format!("couldn't initialize '{}'", args.device.display()))?;

    let expected_size = manager.format().map(|format| format.resolution.as_tuple());
    let writer = FrameWriter::new(args.storage_mode())
        .with_quiet(args.quiet)
        .with_expected_size(expected_size);
    let mut sink = CodecSink::new(namer, writer);

    manager.capture(&mut sink).context("capture failed")
}
