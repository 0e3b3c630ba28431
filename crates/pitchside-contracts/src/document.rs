use chrono::NaiveDate;

use pitchside_models::{ContractTerms, TransferType};
use pitchside_rules::{net_to_team, service_charge, SERVICE_CHARGE_PERCENT};

/// One labelled party to the agreement.
#[derive(Debug, Clone, PartialEq)]
pub struct Party {
    pub role: String,
    pub name: String,
}

/// A clause: short heading plus body text. Numbering is applied by the
/// renderers, not stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub heading: String,
    pub body: String,
}

/// One line of the fee schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeRow {
    pub label: String,
    pub amount: String,
    /// The bottom line of the schedule is set heavier than the deductions.
    pub emphasis: bool,
}

/// The structured form of a transfer contract, independent of any output
/// format. Built once from [`ContractTerms`], then rendered to HTML or
/// handed to the raster layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractDocument {
    pub title: String,
    pub reference: String,
    pub issued_on: NaiveDate,
    pub parties: Vec<Party>,
    pub clauses: Vec<Clause>,
    pub fee_rows: Vec<FeeRow>,
    pub signatures: Vec<String>,
}

impl ContractDocument {
    /// Build the document model for a set of agreed terms. Pure: the issue
    /// date is an input, and the fee schedule is derived with the same
    /// arithmetic the marketplace settles with.
    pub fn compose(terms: &ContractTerms, issued_on: NaiveDate) -> Self {
        let title = match terms.transfer_type {
            TransferType::Permanent => "PLAYER TRANSFER AGREEMENT",
            TransferType::Loan => "PLAYER LOAN AGREEMENT",
        };
        let reference = format!(
            "PS-{}",
            terms.pitch_id.simple().to_string()[..8].to_uppercase()
        );

        let parties = vec![
            Party {
                role: "Selling club".to_string(),
                name: terms.team_name.clone(),
            },
            Party {
                role: "Representing agent".to_string(),
                name: terms.agent_name.clone(),
            },
            Party {
                role: "Player".to_string(),
                name: terms.player_name.clone(),
            },
        ];

        let mut clauses = Vec::new();
        match terms.transfer_type {
            TransferType::Permanent => {
                clauses.push(Clause {
                    heading: "Transfer".to_string(),
                    body: format!(
                        "{} transfers the registration of {} on a permanent basis. \
                         The player is represented in this transfer by {}.",
                        terms.team_name, terms.player_name, terms.agent_name
                    ),
                });
            }
            TransferType::Loan => {
                let term = match terms.duration_months {
                    Some(months) => format!("for a term of {months} months"),
                    None => "for a term to be agreed in writing between the parties".to_string(),
                };
                clauses.push(Clause {
                    heading: "Loan".to_string(),
                    body: format!(
                        "{} releases {} on loan {term}. \
                         The player is represented in this transfer by {}.",
                        terms.team_name, terms.player_name, terms.agent_name
                    ),
                });
            }
        }

        clauses.push(Clause {
            heading: "Transfer fee".to_string(),
            body: format!(
                "The transfer fee is {}. Settlement is itemised in the fee schedule \
                 below; the marketplace service charge of {SERVICE_CHARGE_PERCENT}% \
                 is deducted before payout.",
                terms.currency.format_amount(terms.fee)
            ),
        });

        if let Some(salary) = terms.salary {
            clauses.push(Clause {
                heading: "Remuneration".to_string(),
                body: format!(
                    "The player's remuneration is {} per annum, payable by the \
                     engaging club.",
                    terms.currency.format_amount(salary)
                ),
            });
        }
        if let Some(bonuses) = &terms.bonuses {
            clauses.push(Clause {
                heading: "Bonuses".to_string(),
                body: bonuses.clone(),
            });
        }
        if terms.transfer_type == TransferType::Permanent {
            if let Some(months) = terms.duration_months {
                clauses.push(Clause {
                    heading: "Term".to_string(),
                    body: format!(
                        "The playing contract entered into under this transfer runs \
                         for {months} months from the date of signing."
                    ),
                });
            }
        }
        if let Some(extra) = &terms.additional_terms {
            clauses.push(Clause {
                heading: "Additional terms".to_string(),
                body: extra.clone(),
            });
        }

        let fee_rows = vec![
            FeeRow {
                label: "Transfer fee".to_string(),
                amount: terms.currency.format_amount(terms.fee),
                emphasis: false,
            },
            FeeRow {
                label: format!("Service charge ({SERVICE_CHARGE_PERCENT}%)"),
                amount: terms.currency.format_amount(service_charge(terms.fee)),
                emphasis: false,
            },
            FeeRow {
                label: format!("Net to {}", terms.team_name),
                amount: terms.currency.format_amount(net_to_team(terms.fee)),
                emphasis: true,
            },
        ];

        let signatures = vec![
            format!("For and on behalf of {}", terms.team_name),
            format!("Agent: {}", terms.agent_name),
            format!("Player: {}", terms.player_name),
        ];

        Self {
            title: title.to_string(),
            reference,
            issued_on,
            parties,
            clauses,
            fee_rows,
            signatures,
        }
    }

    /// Render the document as a fixed-width, inline-styled HTML page. Needs
    /// no font and never fails, so it doubles as the fallback representation
    /// when rasterization is unavailable.
    pub fn to_html(&self) -> String {
        let mut page = String::with_capacity(6 * 1024);
        page.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"/><title>");
        page.push_str(&escape(&self.title));
        page.push_str("</title></head>\n");
        page.push_str(
            "<body style=\"margin:0;background:#e8e8e8;\
             font-family:Georgia,'Times New Roman',serif;\">\n",
        );
        page.push_str(
            "<div style=\"width:794px;min-height:1123px;margin:0 auto;\
             background:#ffffff;box-sizing:border-box;padding:64px 60px;\
             color:#1a1a1a;\">\n",
        );

        page.push_str(&format!(
            "<h1 style=\"text-align:center;font-size:24px;letter-spacing:2px;\
             margin:0 0 4px;\">{}</h1>\n",
            escape(&self.title)
        ));
        page.push_str(&format!(
            "<p style=\"text-align:center;font-size:12px;color:#666666;\
             margin:0 0 24px;\">{} &middot; issued {}</p>\n",
            escape(&self.reference),
            self.issued_on.format("%-d %B %Y")
        ));
        page.push_str(
            "<hr style=\"border:none;border-top:2px solid #1a1a1a;margin:0 0 24px;\"/>\n",
        );

        page.push_str(
            "<h2 style=\"font-size:14px;text-transform:uppercase;\
             letter-spacing:1px;margin:0 0 8px;\">Between</h2>\n",
        );
        page.push_str("<table style=\"width:100%;font-size:13px;border-collapse:collapse;margin:0 0 24px;\">\n");
        for party in &self.parties {
            page.push_str(&format!(
                "<tr><td style=\"padding:3px 0;color:#666666;width:180px;\">{}</td>\
                 <td style=\"padding:3px 0;\">{}</td></tr>\n",
                escape(&party.role),
                escape(&party.name)
            ));
        }
        page.push_str("</table>\n");

        page.push_str("<ol style=\"font-size:13px;line-height:1.5;margin:0 0 24px;padding-left:20px;\">\n");
        for clause in &self.clauses {
            page.push_str(&format!(
                "<li style=\"margin:0 0 12px;\"><strong>{}.</strong> {}</li>\n",
                escape(&clause.heading),
                escape(&clause.body)
            ));
        }
        page.push_str("</ol>\n");

        page.push_str(
            "<h2 style=\"font-size:14px;text-transform:uppercase;\
             letter-spacing:1px;margin:0 0 8px;\">Fee schedule</h2>\n",
        );
        page.push_str("<table style=\"width:100%;font-size:13px;border-collapse:collapse;margin:0 0 40px;\">\n");
        for row in &self.fee_rows {
            let (weight, border) = if row.emphasis {
                ("bold", "border-top:2px solid #1a1a1a;")
            } else {
                ("normal", "border-top:1px solid #dddddd;")
            };
            page.push_str(&format!(
                "<tr><td style=\"padding:6px 0;{border}font-weight:{weight};\">{}</td>\
                 <td style=\"padding:6px 0;{border}font-weight:{weight};\
                 text-align:right;\">{}</td></tr>\n",
                escape(&row.label),
                escape(&row.amount)
            ));
        }
        page.push_str("</table>\n");

        page.push_str("<table style=\"width:100%;font-size:12px;border-collapse:collapse;\"><tr>\n");
        for slot in &self.signatures {
            page.push_str(&format!(
                "<td style=\"width:33%;padding:40px 12px 0 0;\">\
                 <div style=\"border-top:1px solid #1a1a1a;padding-top:6px;\
                 color:#444444;\">{}</div></td>\n",
                escape(slot)
            ));
        }
        page.push_str("</tr></table>\n</div>\n</body></html>\n");

        page
    }
}

/// Minimal HTML escaping for user-entered names and free-text terms.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
