use std::{collections::HashMap, fmt::Display, io::Write};

use bird_finder_core::{
    entities::*, gateways::ResultsView, results::Pagination, text::Translations,
};

/// Renders the result list and popup cards as plain text.
#[derive(Debug)]
pub struct ConsoleView<W> {
    out: W,
    t: Translations,
    records: HashMap<Id, ObservationRecord>,
    loading: bool,
}

impl<W> ConsoleView<W>
where
    W: Write,
{
    pub fn new(out: W, t: Translations) -> Self {
        Self {
            out,
            t,
            records: HashMap::new(),
            loading: false,
        }
    }

    fn line(&mut self, line: impl Display) {
        self.loading = false;
        if let Err(err) = writeln!(self.out, "{line}") {
            log::warn!("Unable to write output: {err}");
        }
    }

    fn list_entry(&self, record: &ObservationRecord) -> String {
        let mut entry = format!(
            "{:>12}  {} ({})",
            record.id,
            record.species_name(self.t.translate("Unnamed")),
            record.taxon_name
        );
        if let Some(place) = &record.place_guess {
            entry.push_str(" - ");
            entry.push_str(place);
        }
        entry
    }

    fn pagination_summary(&self, pagination: &Pagination) -> Vec<String> {
        let t = &self.t;
        let options = pagination
            .per_page_options
            .iter()
            .map(|option| {
                if *option == pagination.per_page {
                    format!("[{option}]")
                } else {
                    option.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        vec![
            format!(
                "{} {} {} {} {}",
                t.translate("Showing"),
                pagination.showing,
                t.translate("of"),
                pagination.total_results,
                t.translate("records")
            ),
            format!(
                "{} {} {}/{} {}",
                if pagination.has_previous { "<<" } else { "  " },
                t.translate("Page"),
                pagination.page,
                pagination.total_pages,
                if pagination.has_next { ">>" } else { "" }
            ),
            format!("{}: {options}", t.translate("Records per page")),
        ]
    }

    fn popup_card(&self, record: &ObservationRecord) -> Vec<String> {
        let t = &self.t;
        let mut card = vec![format!(
            "== {} ({})",
            record.species_name(t.translate("Unnamed")),
            record.taxon_name
        )];
        for url in record.large_photo_urls() {
            card.push(format!("   {url}"));
        }
        for sound in &record.sounds {
            card.push(format!("   {}", sound.url));
        }
        if let Some(description) = &record.description {
            card.push(format!("   {description}"));
        }
        if let Some(link) = record.reference_link(t.lang()) {
            card.push(format!("   {}: {}", link.title, link.url));
        }
        card.push(format!(
            "   {} {} <{}>",
            t.translate("Observed by"),
            record.user.display_name(),
            record.user.profile_url()
        ));
        if let Some(created_on) = record.created_on() {
            card.push(format!("   {created_on}"));
        }
        if !record.permalink.is_empty() {
            card.push(format!("   {}", record.permalink));
        }
        card
    }
}

impl<W> ResultsView for ConsoleView<W>
where
    W: Write,
{
    fn show_welcome(&mut self) {
        self.records.clear();
        let lines = [
            "Enter above or select an area to begin your bird species search",
            "To do so, use the drawing tools located on the left side",
        ];
        for line in lines {
            let line = format!("{}.", self.t.translate(line));
            self.line(line);
        }
    }

    fn show_loader(&mut self) {
        self.records.clear();
        if self.loading {
            return;
        }
        let line = self.t.translate("Loading...").to_string();
        self.line(line);
        self.loading = true;
    }

    fn show_results(&mut self, records: &[ObservationRecord], pagination: Option<&Pagination>) {
        let mut lines: Vec<_> = records.iter().map(|r| self.list_entry(r)).collect();
        if let Some(pagination) = pagination {
            lines.extend(self.pagination_summary(pagination));
        }
        self.records = records
            .iter()
            .map(|r| (r.id.clone(), r.clone()))
            .collect();
        for line in lines {
            self.line(line);
        }
    }

    fn show_no_results(&mut self) {
        let lines = [
            format!("{}.", self.t.translate("No results found")),
            format!("{}.", self.t.translate("Please try again with other filters")),
        ];
        for line in lines {
            self.line(line);
        }
    }

    fn show_failure(&mut self, message: &str) {
        let line = format!("{}: {message}", self.t.translate("Search failed"));
        self.line(line);
    }

    fn set_search_term(&mut self, term: &str) {
        log::debug!("Search term: '{term}'");
    }

    fn highlight_item(&mut self, id: &Id) {
        let Some(record) = self.records.get(id) else {
            log::debug!("Record {id} is not listed");
            return;
        };
        for line in self.popup_card(record) {
            self.line(line);
        }
    }

    fn unhighlight_item(&mut self, id: &Id) {
        log::debug!("Unhighlight record {id}");
    }
}
