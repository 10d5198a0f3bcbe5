// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database layout and format-version constants.
//!
//! RelaxIS writes these tables itself; the DDL here documents the layout
//! this crate expects and lets tests build fixture files. The library never
//! executes it against a user database.

/// `DatabaseFormat` values this library understands.
pub const SUPPORTED_FORMATS: &[i64] = &[1, 2];

/// Format-version gate lookup, executed exactly once per open.
pub(crate) const FORMAT_QUERY: &str = "SELECT Value FROM Properties WHERE Name = 'DatabaseFormat'";

/// Reference DDL for the relations this library reads.
pub const SCHEMA_SQL: &str = r#"
create table if not exists Properties (
    Name  text primary key not null,
    Value text
);

create table if not exists Projects (
    ID   integer primary key autoincrement not null,
    NAME text not null,
    DATE text not null
);

create table if not exists Files (
    ID            integer not null,
    project_id    integer not null,
    groupname     text,
    fitted        integer not null default 0,
    lowfreqlimit  real,
    highfreqlimit real,
    dateadded     text,
    datefitted    text,
    primary key (ID, project_id),
    foreign key (project_id) references Projects(ID)
);

create table if not exists Datapoints (
    file_id   integer not null,
    frequency real not null,
    zreal     real not null,
    zimag     real not null
);

create index if not exists IndexDatapointsFile on Datapoints(file_id);

create table if not exists FileInformation (
    file_id integer not null,
    name    text not null,
    value   text
);

create index if not exists IndexFileInformationFile on FileInformation(file_id);

create table if not exists Fitparameters (
    file_id    integer not null,
    pindex     integer not null,
    name       text not null,
    value      real,
    error      real,
    lowerlimit real,
    upperlimit real
);

create index if not exists IndexFitparametersFile on Fitparameters(file_id);
"#;
