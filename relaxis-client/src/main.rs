// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Demo client: dump the first spectrum of the first project in a RelaxIS
//! file, plus its fit parameters. Exercises the whole library surface and
//! nothing more.

use std::env;
use std::process::exit;

use relaxis_db::RelaxisDb;

fn run(args: Vec<String>) -> i32 {
    let Some(path) = args.first() else {
        eprintln!("Usage: relaxis-dump [FILE]");
        return 1;
    };

    let db = match RelaxisDb::open(path) {
        Ok(db) => db,
        Err(err) => {
            eprintln!("Unable to open {path}: {err}");
            return 2;
        }
    };

    let projects = match db.projects() {
        Ok(projects) if !projects.is_empty() => projects,
        Ok(_) => {
            eprintln!("File contains no projects");
            return 4;
        }
        Err(_) => {
            eprintln!("Unable to list projects: {}", db.last_error().text());
            return 4;
        }
    };

    let project = &projects[0];
    let ids = match db.spectrum_ids(project) {
        Ok(ids) => ids,
        Err(_) => {
            eprintln!(
                "No spectra in project {}: {}",
                project.id,
                db.last_error().text()
            );
            return 3;
        }
    };
    for id in &ids {
        println!("PROJECT: {} ID: {id}", project.id);
    }

    let spectrum = match db.spectrum(project, ids[0]) {
        Ok(spectrum) => spectrum,
        Err(_) => {
            eprintln!(
                "Could not load spectrum {} of project {}: {}",
                ids[0],
                project.id,
                db.last_error().text()
            );
            return 3;
        }
    };

    println!(
        "Spectrum for PROJECT: {} ID: {}\nomega, re, im",
        project.id, spectrum.id
    );
    for point in spectrum.datapoints.as_deref().unwrap_or_default() {
        println!("{},{},{}", point.omega, point.re, point.im);
    }
    for meta in &spectrum.metadata {
        println!("Metadata {}: {}", meta.key, meta.raw);
    }

    let parameters = match db.fit_parameters(project, ids[0]) {
        Ok(parameters) => parameters,
        Err(_) => {
            eprintln!(
                "Could not get parameters for project {} spectrum {}: {}",
                project.id,
                ids[0],
                db.last_error().text()
            );
            return 4;
        }
    };
    for param in &parameters {
        println!(
            "Parameter {}: Name: {} Value: {} Error: {}",
            param.index, param.name, param.value, param.error
        );
    }

    db.close();
    0
}

fn main() {
    exit(run(env::args().skip(1).collect()));
}
