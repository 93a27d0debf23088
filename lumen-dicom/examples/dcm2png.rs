//! This example shows you how to convert a DICOM image into a PNG file.
//!
//! Set `RUST_LOG=debug` to see what the loader skips or tolerates.

#![allow(missing_docs)]

use std::process::ExitCode;

use lumen_dicom::{LoadSettings, MissingPixelPolicy, Window, load};

fn main() -> ExitCode {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .try_init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() != 3 && args.len() != 5 {
        eprintln!(
            "Usage: {} <input.dcm> <output.png> [<window center> <window width>]",
            args[0]
        );

        return ExitCode::FAILURE;
    }

    let input_path = &args[1];
    let output_path = &args[2];

    let window = if args.len() == 5 {
        match (args[3].parse::<f64>(), args[4].parse::<f64>()) {
            (Ok(center), Ok(width)) => Some(Window { center, width }),
            _ => {
                eprintln!("Window center and width must be numbers");

                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    let data = match std::fs::read(input_path) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("Failed to read input file: {err}");

            return ExitCode::FAILURE;
        }
    };

    let settings = LoadSettings {
        missing_pixels: MissingPixelPolicy::Error,
        window,
        ..LoadSettings::default()
    };

    let image = match load(&data, &settings) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("Failed to load DICOM: {err}");

            return ExitCode::FAILURE;
        }
    };

    let metadata = &image.metadata;
    println!(
        "Loaded: {}x{} {} image of {}",
        image.width(),
        image.height(),
        metadata.modality.as_deref().unwrap_or("unknown"),
        metadata.patient_name.as_deref().unwrap_or("unknown patient"),
    );

    if let Some(spacing) = image.pixel_spacing {
        println!("Pixel spacing: {} x {} mm", spacing.row, spacing.column);
    }

    let Some(rgba) = image.to_rgba_image() else {
        eprintln!("Internal error: Buffer size mismatch");

        return ExitCode::FAILURE;
    };

    if let Err(err) = rgba.save(output_path) {
        eprintln!("Failed to save PNG: {err}");

        return ExitCode::FAILURE;
    }

    eprintln!("Saved: {output_path}");

    ExitCode::SUCCESS
}
