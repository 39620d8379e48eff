use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Compress images and preview the savings", long_about = None)]
pub struct Args {
    /// Images to compress. Without any, an interactive session starts.
    pub files: Vec<PathBuf>,

    /// Initial slider position, 0-100.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub quality: Option<u32>,

    /// Directory compressed files are saved to.
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Start the interactive session even when files are given.
    #[arg(short, long)]
    pub interactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch_arguments() {
        let args = Args::parse_from(["image_compressor", "-q", "60", "--out-dir", "out", "a.jpg", "b.png"]);
        assert_eq!(args.quality, Some(60));
        assert_eq!(args.out_dir, Some(PathBuf::from("out")));
        assert_eq!(args.files.len(), 2);
        assert!(!args.interactive);
    }

    #[test]
    fn test_quality_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["image_compressor", "--quality", "150"]).is_err());
    }
}
