use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::{fs, io};

use regex::Regex;

use blogform::config::CFG_FILE_NAME;

use crate::decompress::decompress_files;
use crate::BootstrapArgs;

fn get_sample_cfg() -> &'static str {
    include_str!("../../../res/blogform.toml")
}

fn write_blogform_cfg(out_dir: &Path) -> io::Result<()> {
    let file = File::create(out_dir.join(CFG_FILE_NAME))?;
    let mut writer = BufWriter::new(file);

    let sample_cfg = replace_paths(out_dir, get_sample_cfg());
    writer.write_all(sample_cfg.as_bytes())?;

    writer.flush()
}

/// Points every `res/<dir>` path of the sample config at `prefix/<dir>`.
fn replace_paths(prefix: &Path, config_data: &str) -> String {
    let prefix = prefix.to_string_lossy();
    let prefix = prefix.trim_end_matches('/');

    let res_regex = Regex::new(r#""res/(\w+)""#).unwrap();
    res_regex.replace_all(config_data, |captures: &regex::Captures| {
        format!("\"{}/{}\"", prefix, &captures[1])
    }).to_string()
}

pub fn bootstrap_cmd(args: BootstrapArgs) -> anyhow::Result<()> {
    fs::create_dir_all(&args.out_dir)?;
    let out_path = fs::canonicalize(&args.out_dir)
        .map_err(|e| anyhow::anyhow!("Error converting path to absolute: {} - {}", &args.out_dir, e))?;

    decompress_files(&out_path)
        .map_err(|e| anyhow::anyhow!("Error bootstrapping: {}", e))?;
    write_blogform_cfg(&out_path)
        .map_err(|e| anyhow::anyhow!("Error writing blogform configuration: {}", e))?;

    println!("Blog form bootstrapped in {}", out_path.display());
    Ok(())
}
