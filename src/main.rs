// Compute pairwise dependence scores between the rows of a TSV matrix.
// Each row is one variable; the first field is its ID, the rest are samples.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, Cursor, Read, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use clap::Parser;
use csv::{ReaderBuilder, WriterBuilder};
use flate2::{
    read::{GzDecoder, MultiGzDecoder},
    write::GzEncoder,
    Compression,
};
use mindep::{make, matrix, Error, GoodnessOfFit, MeasureConfig, MeasureKind, Result};
use ndarray::{Array1, Array2};
use tar::{Archive, Builder, Header};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Pairwise dependence matrix of the rows of a TSV file
#[derive(Parser, Debug)]
#[command(name = "mindep")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input TSV (.tsv, .gz or .tar.gz), one variable per row
    input: PathBuf,

    /// Measure: pearson, spearman, dcor, hoeffding, mi, js, hics, mcde,
    /// surfing, slope, slopeinversion
    measure: MeasureKind,

    /// Output path; `-` writes plain TSV to stdout. Defaults to
    /// `<input>_<measure>_dependence.tar.gz`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of threads (default: all available)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Monte-Carlo iterations for HiCS and MCDE
    #[arg(short, long, default_value = "50")]
    m: usize,

    /// Slice share (HiCS default 0.1, MCDE default 0.5)
    #[arg(long)]
    alpha: Option<f64>,

    /// MCDE marginal restriction share
    #[arg(long, default_value = "0.5")]
    beta: f64,

    /// HiCS goodness-of-fit test: ks or welch
    #[arg(long, default_value = "ks")]
    test: GoodnessOfFit,

    /// Random seed for HiCS and MCDE
    #[arg(long)]
    seed: Option<u64>,
}

fn build_data_matrix(row_ids: &[String], row_data: &HashMap<String, Array1<f64>>) -> Array2<f64> {
    let n_rows = row_ids.len();
    let n_cols = row_data.values().next().map(|v| v.len()).unwrap_or(0);

    let mut data = Array2::<f64>::zeros((n_rows, n_cols));
    for (i, row_id) in row_ids.iter().enumerate() {
        if let Some(values) = row_data.get(row_id) {
            data.row_mut(i).assign(values);
        }
    }
    data
}

fn read_matrix_data<R: Read>(reader: R) -> Result<HashMap<String, Array1<f64>>> {
    let mut row_data = HashMap::new();
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(reader);

    let header_len = rdr.headers()?.len();
    if header_len < 3 {
        return Err(Error::Parse(
            "Input file must contain a row ID column and at least two samples".to_string(),
        ));
    }

    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        // Header offset
        let line = idx + 2;

        let row_id = record.get(0).unwrap_or("").trim();
        if row_id.is_empty() {
            return Err(Error::Parse(format!("Empty row ID encountered on line {}", line)));
        }
        if row_data.contains_key(row_id) {
            return Err(Error::Parse(format!(
                "Duplicate row ID '{}' encountered on line {}",
                row_id, line
            )));
        }

        let values: Array1<f64> = record
            .iter()
            .skip(1)
            .map(|s| s.trim().parse().unwrap_or(f64::NAN))
            .collect::<Vec<_>>()
            .into();
        row_data.insert(row_id.to_string(), values);
    }
    Ok(row_data)
}

fn load(path: &Path) -> Result<HashMap<String, Array1<f64>>> {
    let name = path.to_string_lossy();
    if name.ends_with(".tar.gz") {
        let mut archive = Archive::new(GzDecoder::new(File::open(path)?));
        for entry in archive.entries()? {
            let mut entry = entry?;
            if entry.header().entry_type().is_file() {
                return read_matrix_data(&mut entry);
            }
        }
        Err(Error::Parse("No readable file found in tar archive".to_string()))
    } else if name.ends_with(".gz") {
        read_matrix_data(MultiGzDecoder::new(File::open(path)?))
    } else {
        read_matrix_data(File::open(path)?)
    }
}

fn write_tsv<W: Write>(out: W, row_ids: &[String], scores: &Array2<f64>) -> csv::Result<()> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(out);
    wtr.write_record(std::iter::once("").chain(row_ids.iter().map(String::as_str)))?;
    for (i, row_id) in row_ids.iter().enumerate() {
        let row_vals: Vec<String> = scores.row(i).iter().map(|r| r.to_string()).collect();
        wtr.write_record(std::iter::once(row_id.as_str()).chain(row_vals.iter().map(String::as_str)))?;
    }
    wtr.flush()?;
    Ok(())
}

fn input_basename(path: &Path) -> &str {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("data");
    stem.strip_suffix(".tar")
        .or_else(|| stem.strip_suffix(".tsv"))
        .unwrap_or(stem)
}

fn write_output(args: &Args, row_ids: &[String], scores: &Array2<f64>) -> Result<()> {
    let suffix = args.measure.to_string().to_lowercase();
    let base = input_basename(&args.input);
    let path = match &args.output {
        Some(p) if p.as_os_str() == "-" => {
            write_tsv(io::stdout().lock(), row_ids, scores)?;
            return Ok(());
        }
        Some(p) => p.clone(),
        None => PathBuf::from(format!("{}_{}_dependence.tar.gz", base, suffix)),
    };

    let name = path.to_string_lossy().into_owned();
    if name.ends_with(".tar.gz") {
        let mut buf = Vec::<u8>::new();
        write_tsv(&mut buf, row_ids, scores)?;

        let enc = GzEncoder::new(File::create(&path)?, Compression::default());
        let mut tar_builder = Builder::new(enc);
        let mut header = Header::new_gnu();
        header.set_size(buf.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        let tsv_name = format!("{}_{}_dependence.tsv", base, suffix);
        tar_builder.append_data(&mut header, tsv_name, &mut Cursor::new(buf))?;
        tar_builder.into_inner()?.finish()?;
    } else if name.ends_with(".gz") {
        let mut enc = GzEncoder::new(File::create(&path)?, Compression::default());
        write_tsv(&mut enc, row_ids, scores)?;
        enc.finish()?;
    } else {
        write_tsv(File::create(&path)?, row_ids, scores)?;
    }
    info!(path = %path.display(), "output written");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| {
                warn!(error = %e, "failed to set thread pool");
                Error::InvalidParameter {
                    name: "threads",
                    message: "the global thread pool could not be configured",
                }
            })?;
        info!(threads, "thread pool configured");
    }

    let config = MeasureConfig {
        kind: args.measure,
        m: args.m,
        alpha: args.alpha,
        beta: args.beta,
        test: args.test,
        seed: args.seed,
    };
    let measure = make(&config)?;

    let load_start = Instant::now();
    let row_data = load(&args.input)?;
    let mut row_ids: Vec<String> = row_data.keys().cloned().collect();
    row_ids.sort();
    let data = build_data_matrix(&row_ids, &row_data);
    info!(
        rows = data.nrows(),
        samples = data.ncols(),
        secs = load_start.elapsed().as_secs_f64(),
        "data loaded"
    );

    let calc_start = Instant::now();
    debug!(measure = %args.measure, "computing dependence matrix");
    let scores = matrix(&measure, &data, measure.self_dependence())?;
    info!(
        measure = %args.measure,
        secs = calc_start.elapsed().as_secs_f64(),
        "dependence scores calculated"
    );

    write_output(&args, &row_ids, &scores)
}
