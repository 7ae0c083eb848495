// Logical field synonym lists
//
// Records arrive in two shapes: the structured API shape (top-level keys) and
// the legacy table-derived shape (`columns.<Label>.value`). Each logical field
// is an ordered list of paths; the first path holding a usable value wins.
// Reordering a list changes which value is stored.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    /// Top-level key of the structured shape.
    Key(&'static str),
    /// `columns.<label>.value` of the table-derived shape.
    Column(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalField {
    pub name: &'static str,
    pub paths: &'static [FieldPath],
}

use FieldPath::{Column, Key};

pub const EVENT_NAME: LogicalField = LogicalField {
    name: "event_name",
    paths: &[Key("name"), Column("Event"), Key("title"), Key("meet")],
};

pub const EVENT_DATE: LogicalField = LogicalField {
    name: "event_date",
    paths: &[Key("date"), Column("Start Date"), Key("start_date")],
};

pub const EVENT_FALLBACK_ID: LogicalField = LogicalField {
    name: "event_id",
    paths: &[Key("id")],
};

pub const LIFTER_NAME: LogicalField = LogicalField {
    name: "lifter_name",
    paths: &[Key("lifter"), Column("Athlete"), Key("name"), Column("Name")],
};

pub const AGE_CATEGORY: LogicalField = LogicalField {
    name: "age_category",
    paths: &[Key("age_category"), Column("Age Category"), Key("age"), Column("Age")],
};

pub const BODY_WEIGHT: LogicalField = LogicalField {
    name: "body_weight",
    paths: &[Key("body_weight_kg"), Column("Bodyweight"), Key("body_weight_(kg)")],
};

pub const SNATCH_1: LogicalField = LogicalField {
    name: "snatch1",
    paths: &[Key("snatch_lift_1"), Column("Snatch 1")],
};

pub const SNATCH_2: LogicalField = LogicalField {
    name: "snatch2",
    paths: &[Key("snatch_lift_2"), Column("Snatch 2")],
};

pub const SNATCH_3: LogicalField = LogicalField {
    name: "snatch3",
    paths: &[Key("snatch_lift_3"), Column("Snatch 3")],
};

pub const BEST_SNATCH: LogicalField = LogicalField {
    name: "snatch_best",
    paths: &[Key("best_snatch"), Column("Best Snatch")],
};

pub const CLEAN_JERK_1: LogicalField = LogicalField {
    name: "cj1",
    paths: &[Key("cj_lift_1"), Column("Clean & Jerk 1"), Key("c&j_lift_1")],
};

pub const CLEAN_JERK_2: LogicalField = LogicalField {
    name: "cj2",
    paths: &[Key("cj_lift_2"), Column("Clean & Jerk 2"), Key("c&j_lift_2")],
};

pub const CLEAN_JERK_3: LogicalField = LogicalField {
    name: "cj3",
    paths: &[Key("cj_lift_3"), Column("Clean & Jerk 3"), Key("c&j_lift_3")],
};

pub const BEST_CLEAN_JERK: LogicalField = LogicalField {
    name: "cj_best",
    paths: &[Key("best_cj"), Column("Best Clean & Jerk"), Key("best_c&j")],
};

pub const TOTAL: LogicalField = LogicalField {
    name: "total",
    paths: &[Key("total"), Column("Total")],
};
