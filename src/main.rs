use anyhow::{Context, bail};
use clap::Parser;
use log::{LevelFilter, info, warn};
use musicbox_svg::{
    MidiFile, MusicBoxProfile, SvgFormatOptions, TapeLayout,
    file::Timing,
    profile::BuiltInProfile,
    stats::MidiStats,
    svg::export_file_name,
};
use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};

/// Convert a MIDI file into printable punch-hole pages for a paper-strip music box.
///
/// Logging is controlled with RUST_LOG; see docs for the env_logger crate.
/// If RUST_LOG is not set, the log level defaults to Info.
/// Set RUST_LOG=musicbox_svg=debug to see page seams and skipped notes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, verbatim_doc_comment)]
struct Args {
    /// Path to the MIDI file
    midi: PathBuf,

    /// Built-in music box profile: fifteen-note or thirty-note
    #[arg(short, long, default_value = "fifteen-note")]
    profile: String,

    /// Load the music box profile from a JSON file instead of a built-in one
    #[arg(long, conflicts_with = "profile")]
    profile_file: Option<PathBuf>,

    /// Load format options from a JSON file; flags below override it
    #[arg(long)]
    options_file: Option<PathBuf>,

    /// Max page width in millimeters, 0 for a single page
    #[arg(short = 'w', long)]
    page_width: Option<f64>,

    /// Max page height in millimeters, 0 for no limit
    #[arg(long)]
    page_height: Option<f64>,

    /// Blank paper before the first note, in millimeters
    #[arg(long)]
    start_padding: Option<f64>,

    /// Do not draw page borders
    #[arg(long)]
    no_border: bool,

    /// Only draw the outer edges of the first and last pages
    #[arg(long)]
    omit_page_boundaries: bool,

    /// Move out of range notes by octaves into range
    #[arg(short, long)]
    transpose: bool,

    /// Draw straight joins between pages instead of jigsaw teeth
    #[arg(long)]
    no_jigsaw: bool,

    /// Join the last page back to the first
    #[arg(long)]
    loop_mode: bool,

    /// Directory for the page files (default: next to the MIDI file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the decoded file as JSON to stdout
    #[arg(long)]
    dump_json: bool,

    /// Print tempo, pitch range and note counts
    #[arg(long)]
    stats: bool,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn load_profile(args: &Args) -> anyhow::Result<MusicBoxProfile> {
    if let Some(path) = &args.profile_file {
        let profile: MusicBoxProfile = read_json(path)?;
        profile
            .validate()
            .with_context(|| format!("invalid profile in {}", path.display()))?;
        return Ok(profile);
    }
    match BuiltInProfile::from_key(&args.profile) {
        Some(preset) => Ok(preset.profile()),
        None => {
            let known: Vec<&str> = BuiltInProfile::ALL.iter().map(|p| p.key()).collect();
            bail!(
                "unknown profile {}; expected one of {}",
                args.profile,
                known.join(", ")
            )
        }
    }
}

fn load_options(args: &Args) -> anyhow::Result<SvgFormatOptions> {
    let mut options = match &args.options_file {
        Some(path) => read_json(path)?,
        None => SvgFormatOptions::default(),
    };
    if let Some(width) = args.page_width {
        options.page_width_mm = width;
    }
    if let Some(height) = args.page_height {
        options.page_height_mm = height;
    }
    if let Some(padding) = args.start_padding {
        options.start_padding_mm = padding;
    }
    options.render_border &= !args.no_border;
    options.jigsaw_joiners &= !args.no_jigsaw;
    options.omit_page_boundaries |= args.omit_page_boundaries;
    options.transpose_out_of_range_notes |= args.transpose;
    options.loop_mode |= args.loop_mode;
    Ok(options)
}

fn print_stats(file: &MidiFile) {
    let stats = MidiStats::from_file(file);
    let header = file.header();
    println!("format: {:?}, {} tracks", header.format(), file.tracks().len());
    match header.timing() {
        Timing::TicksPerQuarterNote(tpqn) => {
            println!("timing: {} ticks per quarter note", tpqn.ticks_per_quarter_note())
        }
        Timing::Smpte(smpte) => println!(
            "timing: {} fps, {} ticks per frame",
            smpte.fps().as_f64(),
            smpte.ticks_per_frame()
        ),
    }
    for mark in &stats.tempos {
        println!("tempo: {:.2} bpm at {:.3}s", mark.bpm(), mark.time_seconds);
    }
    println!("duration: {:.3}s", stats.duration_seconds);
    if let (Some(low), Some(high)) = (stats.lowest_note, stats.highest_note) {
        println!("range: {low} - {high}, {} notes", stats.note_count());
    }
    for (note, count) in &stats.histogram {
        println!("  {:>4}: {count}", note.to_string());
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut log_builder = env_logger::builder();
    if env::var("RUST_LOG").is_err() {
        log_builder.filter_level(LevelFilter::Info);
    }
    log_builder.init();

    let profile = load_profile(&args)?;
    let options = load_options(&args)?;

    let bytes =
        fs::read(&args.midi).with_context(|| format!("failed to read {}", args.midi.display()))?;
    let file = MidiFile::parse(&bytes)
        .with_context(|| format!("failed to decode {}", args.midi.display()))?;

    if args.dump_json {
        println!("{}", serde_json::to_string_pretty(&file)?);
    }
    if args.stats {
        print_stats(&file);
    }

    let layout = TapeLayout::compute(&file, &profile, &options)?;
    let diagnostics = layout.diagnostics();
    if diagnostics.transposed_count > 0 {
        info!("transposed {} notes", diagnostics.transposed_count);
    }
    if diagnostics.skipped_count > 0 {
        warn!(
            "skipped {} notes closer than {} mm to the previous hole",
            diagnostics.skipped_count, profile.min_note_gap_mm
        );
    }
    info!(
        "total paper length: {:.2} mm, width: {} mm",
        diagnostics.total_paper_length_mm, profile.paper_width_mm
    );

    let stem = args
        .midi
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => args
            .midi
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    for page in layout.page_geometry() {
        let path = output_dir.join(export_file_name(stem, page.number, "svg"));
        fs::write(&path, page.to_svg())
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        process::exit(2);
    }
}
