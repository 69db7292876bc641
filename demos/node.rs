use clap::Parser;
use geo_noding::{
    extract_segment_strings, Noder, NodingValidator, PrecisionModel, ScaledNoder, SnapRoundingNoder,
};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use std::convert::TryInto;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input GeoJSON file (LineStrings or Polygons)
    #[arg(short, long)]
    input: PathBuf,

    /// Output GeoJSON file (noded LineStrings)
    #[arg(short, long)]
    output: PathBuf,

    /// Grid scale factor; coordinates are rounded to multiples of 1 / scale
    #[arg(short, long, default_value_t = 1e6)]
    scale: f64,

    /// Maximum number of snap-rounding rescan passes
    #[arg(long, default_value_t = 10)]
    max_passes: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let inner = SnapRoundingNoder::new(PrecisionModel::fixed(1.0)?).with_max_passes(args.max_passes)?;
    let mut noder = ScaledNoder::new(inner, args.scale)?;

    // Read Input
    println!("Reading input from {:?}", args.input);
    let file = File::open(&args.input)?;
    let reader = BufReader::new(file);
    let geojson: GeoJson = serde_json::from_reader(reader)?;

    let mut geoms: Vec<geo_types::Geometry<f64>> = Vec::new();
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in fc.features {
                if let Some(geom) = feature.geometry {
                    geoms.push(geom.try_into()?);
                }
            }
        }
        GeoJson::Geometry(geom) => geoms.push(geom.try_into()?),
        GeoJson::Feature(feature) => {
            if let Some(geom) = feature.geometry {
                geoms.push(geom.try_into()?);
            }
        }
    }

    println!("Loaded {} features.", geoms.len());
    let collection = geo_types::Geometry::GeometryCollection(geoms.into_iter().collect());
    let strings = extract_segment_strings(&collection)?;
    println!("Noding {} edges at scale {}...", strings.len(), args.scale);

    let noded = noder.node(strings)?;

    let report = noder.inner().report();
    println!(
        "{} interior intersections, {} hot pixels, {} passes.",
        report.interior_intersections, report.hot_pixels, report.passes
    );
    if !report.converged {
        println!("Warning: snap-rounding did not converge; output may still contain crossings.");
    }
    if let Err(e) = NodingValidator::new(&noded).check_valid() {
        println!("Warning: {}", e);
    }
    println!("Produced {} noded edges.", noded.len());

    // Write Output
    let features: Vec<Feature> = noded
        .iter()
        .map(|edge| {
            let geometry = Geometry::new(Value::from(&edge.to_line_string()));
            let mut properties = JsonObject::new();
            properties.insert("edge".to_string(), (*edge.data()).into());
            Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let output_fc = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let file = File::create(&args.output)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &GeoJson::FeatureCollection(output_fc))?;

    println!("Wrote output to {:?}", args.output);

    Ok(())
}
