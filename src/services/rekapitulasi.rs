//! Monthly day-by-pangkalan aggregation of daily distribution rows.
//!
//! The same grid serves both actual (penyaluran) and planned (perencanaan)
//! distribution. Everything here is pure; the services load the rows.

use crate::{
    entities::{pangkalan, Kondisi, LpgType},
    errors::ServiceError,
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// A calendar month parsed from `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month {
    first_day: NaiveDate,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next_first_day()
            .and_then(|d| d.pred_opt())
            .unwrap_or(self.first_day)
    }

    fn next_first_day(&self) -> Option<NaiveDate> {
        let (year, month) = match self.first_day.month() {
            12 => (self.first_day.year() + 1, 1),
            m => (self.first_day.year(), m + 1),
        };
        NaiveDate::from_ymd_opt(year, month, 1)
    }

    pub fn days(&self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day()
    }
}

impl FromStr for Month {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ServiceError::BadRequest(format!("Invalid month '{s}', expected YYYY-MM"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Month::new(year, month).ok_or_else(invalid)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_day.format("%Y-%m"))
    }
}

/// One stored daily quantity, independent of which table it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyEntry {
    pub pangkalan_id: Uuid,
    pub tanggal: NaiveDate,
    pub jumlah: i32,
    pub kondisi: Kondisi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RekapRow {
    pub pangkalan_id: Uuid,
    pub code: String,
    pub name: String,
    pub region: String,
    pub alokasi_bulanan: i64,
    /// Quantity per day of month; index 0 is day 1
    pub harian: Vec<i64>,
    pub total_normal: i64,
    pub total_fakultatif: i64,
    pub total: i64,
    /// Allocation left over; negative when over-distributed
    pub sisa_alokasi: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RekapFooter {
    /// Sum over all pangkalans, per day
    pub harian: Vec<i64>,
    /// Running total up to and including each day
    pub kumulatif: Vec<i64>,
    pub total_alokasi: i64,
    pub total_normal: i64,
    pub total_fakultatif: i64,
    pub grand_total: i64,
    pub total_sisa_alokasi: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Rekapitulasi {
    /// `YYYY-MM`
    pub month: String,
    pub lpg_type: LpgType,
    pub days_in_month: u32,
    pub rows: Vec<RekapRow>,
    pub footer: RekapFooter,
}

/// Builds the grid in one pass over `entries`. Entries outside `month` or for
/// pangkalans not listed are ignored.
pub fn build(
    month: Month,
    lpg_type: LpgType,
    pangkalans: &[pangkalan::Model],
    entries: &[DailyEntry],
) -> Rekapitulasi {
    let days = month.days() as usize;

    let mut rows: Vec<RekapRow> = pangkalans
        .iter()
        .map(|p| RekapRow {
            pangkalan_id: p.id,
            code: p.code.clone(),
            name: p.name.clone(),
            region: p.region.clone(),
            alokasi_bulanan: i64::from(p.alokasi_bulanan),
            harian: vec![0; days],
            total_normal: 0,
            total_fakultatif: 0,
            total: 0,
            sisa_alokasi: 0,
        })
        .collect();
    let index: HashMap<Uuid, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.pangkalan_id, i))
        .collect();

    for entry in entries {
        if !month.contains(entry.tanggal) {
            continue;
        }
        let Some(&i) = index.get(&entry.pangkalan_id) else {
            continue;
        };
        let row = &mut rows[i];
        let jumlah = i64::from(entry.jumlah);
        row.harian[entry.tanggal.day0() as usize] += jumlah;
        match entry.kondisi {
            Kondisi::Normal => row.total_normal += jumlah,
            Kondisi::Fakultatif => row.total_fakultatif += jumlah,
        }
    }

    let mut footer = RekapFooter {
        harian: vec![0; days],
        kumulatif: vec![0; days],
        total_alokasi: 0,
        total_normal: 0,
        total_fakultatif: 0,
        grand_total: 0,
        total_sisa_alokasi: 0,
    };
    for row in &mut rows {
        row.total = row.total_normal + row.total_fakultatif;
        row.sisa_alokasi = row.alokasi_bulanan - row.total_normal - row.total_fakultatif;

        for (day, qty) in row.harian.iter().enumerate() {
            footer.harian[day] += qty;
        }
        footer.total_alokasi += row.alokasi_bulanan;
        footer.total_normal += row.total_normal;
        footer.total_fakultatif += row.total_fakultatif;
        footer.total_sisa_alokasi += row.sisa_alokasi;
    }

    let mut running = 0;
    for (day, qty) in footer.harian.iter().enumerate() {
        running += qty;
        footer.kumulatif[day] = running;
    }
    footer.grand_total = footer.total_normal + footer.total_fakultatif;

    Rekapitulasi {
        month: month.to_string(),
        lpg_type,
        days_in_month: month.days(),
        rows,
        footer,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RealisasiRow {
    pub pangkalan_id: Uuid,
    pub code: String,
    pub name: String,
    pub alokasi_bulanan: i64,
    pub rencana: i64,
    pub realisasi: i64,
    /// `realisasi - rencana`
    pub selisih: i64,
    /// Realisasi as a percentage of rencana; 0 when nothing was planned
    pub persentase: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Realisasi {
    pub month: String,
    pub lpg_type: LpgType,
    pub rows: Vec<RealisasiRow>,
    pub total_rencana: i64,
    pub total_realisasi: i64,
    pub total_selisih: i64,
}

fn percentage(actual: i64, planned: i64) -> f64 {
    if planned <= 0 {
        return 0.0;
    }
    let pct = actual as f64 / planned as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Planned against actual totals per pangkalan. Both grids must have been
/// built over the same pangkalans.
pub fn compare(planned: &Rekapitulasi, actual: &Rekapitulasi) -> Realisasi {
    let actual_totals: HashMap<Uuid, i64> = actual
        .rows
        .iter()
        .map(|row| (row.pangkalan_id, row.total))
        .collect();

    let rows: Vec<RealisasiRow> = planned
        .rows
        .iter()
        .map(|row| {
            let realisasi = actual_totals.get(&row.pangkalan_id).copied().unwrap_or(0);
            RealisasiRow {
                pangkalan_id: row.pangkalan_id,
                code: row.code.clone(),
                name: row.name.clone(),
                alokasi_bulanan: row.alokasi_bulanan,
                rencana: row.total,
                realisasi,
                selisih: realisasi - row.total,
                persentase: percentage(realisasi, row.total),
            }
        })
        .collect();

    let total_rencana = rows.iter().map(|r| r.rencana).sum();
    let total_realisasi = rows.iter().map(|r| r.realisasi).sum();
    Realisasi {
        month: planned.month.clone(),
        lpg_type: planned.lpg_type,
        rows,
        total_rencana,
        total_realisasi,
        total_selisih: total_realisasi - total_rencana,
    }
}
