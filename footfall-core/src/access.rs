// Access-log rendering of finished customer histories.

use footfall_sim::{Customer, SiteGraph, Visit};

/// Render one history entry as an access-log line, or `None` for a
/// terminal entry (a transition with no destination is a session marker,
/// not a request).
pub fn format_visit(graph: &SiteGraph, customer: &Customer, visit: &Visit) -> Option<String> {
    let destination = graph.page(visit.transition.destination?);
    let source = graph.page(visit.source);
    Some(format!(
        "{} {} [{} +0000] \"{} {}\" {} {} \"{}\" {}",
        customer.identity.ip,
        customer.identity.user_id,
        visit.at.format("%d/%b/%Y:%H:%M:%S"),
        visit.transition.method.as_str(),
        destination.path,
        visit.transition.status,
        destination.size,
        source.address(),
        customer.identity.device_id,
    ))
}

/// Lazy iterator over a customer's log lines, in history order. Finite and
/// non-restartable; entries without a destination are skipped.
pub struct AccessLogLines<'a> {
    graph: &'a SiteGraph,
    customer: &'a Customer,
    index: usize,
}

pub fn access_log_lines<'a>(graph: &'a SiteGraph, customer: &'a Customer) -> AccessLogLines<'a> {
    AccessLogLines {
        graph,
        customer,
        index: 0,
    }
}

impl Iterator for AccessLogLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.index < self.customer.history.len() {
            let visit = &self.customer.history[self.index];
            self.index += 1;
            if let Some(line) = format_visit(self.graph, self.customer, visit) {
                return Some(line);
            }
        }
        None
    }
}
