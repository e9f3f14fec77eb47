//! Contract HTML assembly.
//!
//! Produces one self-contained HTML document per lease: header with logo and
//! contract number, party/property/amount/bank blocks, the substituted
//! clauses, an annex section behind a forced page break, signature slots and
//! a footer. Everything except the page-break marker is inline-styled so the
//! word-processor export only has one class to rewrite.
//!
//! Trust boundary: clause content is authored by the building operator, not
//! by tenants, and is embedded as-is. The only transformation applied to it
//! is placeholder substitution and newline-to-`<br>` conversion.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{Datelike, NaiveDate};

use lease_types::{ClauseRecord, LandlordProfile, LeaseSnapshot, TenantSnapshot};

use crate::substitution::{render, SubstitutionContext, UNSPECIFIED_FIELD};

/// The forced page break emitted before the annex section, and the single
/// class-based style in the document.
pub const PAGE_BREAK_HTML: &str = r#"<div class="page-break"></div>"#;

/// A fetched logo, embedded as an inline `data:` URI so the document stays
/// self-contained.
#[derive(Debug, Clone)]
pub struct LogoAsset {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl LogoAsset {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, BASE64.encode(&self.bytes))
    }
}

/// Presentation inputs that are configuration, not lease data.
///
/// `issue_date` drives both the printed date and the `{unit}-{year}` contract
/// number; it is an explicit input so rendering stays a pure function.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub building_name: String,
    pub fallback: String,
    pub issue_date: NaiveDate,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            building_name: "Résidence Les Oliviers".to_string(),
            fallback: UNSPECIFIED_FIELD.to_string(),
            issue_date: chrono::Local::now().date_naive(),
        }
    }
}

/// Contract number shown in the header: `{unit_number}-{year}`.
pub fn contract_number(unit_number: &str, issue_date: NaiveDate) -> String {
    format!("{}-{}", unit_number, issue_date.year())
}

/// Assembles the complete contract document.
///
/// `main_clauses` and `annex_clauses` must already be ordered by
/// `order_index`; the assembler preserves the order it is given. The page
/// break and "ANNEXES" section are emitted only when `annex_clauses` is
/// non-empty. A missing logo omits the image slot, never fails the render.
pub fn assemble(
    landlord: &LandlordProfile,
    tenant: &TenantSnapshot,
    lease: &LeaseSnapshot,
    main_clauses: &[ClauseRecord],
    annex_clauses: &[ClauseRecord],
    logo: Option<&LogoAsset>,
    opts: &RenderOptions,
) -> String {
    let ctx = SubstitutionContext::from_lease(lease, landlord, &opts.fallback);
    let number = contract_number(&lease.property.unit_number, opts.issue_date);
    let date = opts.issue_date.format("%d/%m/%Y");

    let mut html = String::with_capacity(16 * 1024);

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<title>Contrat de location {number}</title>
<style>
body {{ font-family: Helvetica, Arial, sans-serif; color: #1a1a1a; margin: 0; padding: 28px 36px; font-size: 14px; line-height: 1.6; }}
.page-break {{ page-break-before: always; }}
</style>
</head>
<body>
"#,
        number = number
    ));

    // Header
    html.push_str("<div style=\"text-align: center; border-bottom: 2px solid #1f3a5f; padding-bottom: 14px; margin-bottom: 22px;\">\n");
    if let Some(logo) = logo {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"Logo\" style=\"height: 64px; margin-bottom: 8px;\">\n",
            logo.data_uri()
        ));
    }
    html.push_str(&format!(
        "<h1 style=\"margin: 0; font-size: 22px; color: #1f3a5f;\">{}</h1>\n\
         <p style=\"margin: 6px 0 0; font-size: 16px; letter-spacing: 2px;\">CONTRAT DE LOCATION</p>\n\
         <p style=\"margin: 4px 0 0; color: #555;\">Contrat N° {} · Le {}</p>\n\
         </div>\n",
        opts.building_name, number, date
    ));

    // Parties
    html.push_str(&section_title("ENTRE LES SOUSSIGNÉS"));
    html.push_str("<div style=\"margin-bottom: 14px;\">\n<p style=\"margin: 0 0 4px;\"><strong>Le Bailleur</strong></p>\n");
    html.push_str(&field_row("Nom", &landlord.full_name));
    html.push_str(&field_row("Nationalité", &landlord.nationality));
    html.push_str(&field_row(
        "N° de passeport",
        opt(&landlord.passport_number, &opts.fallback),
    ));
    html.push_str(&field_row("Adresse", &landlord.address));
    html.push_str("</div>\n");

    html.push_str("<div style=\"margin-bottom: 14px;\">\n<p style=\"margin: 0 0 4px;\"><strong>Le Locataire</strong></p>\n");
    html.push_str(&field_row("Nom", &tenant.full_name()));
    html.push_str(&field_row("Email", opt(&tenant.email, &opts.fallback)));
    html.push_str(&field_row("Téléphone", opt(&tenant.phone, &opts.fallback)));
    html.push_str("</div>\n");

    // Property
    html.push_str(&section_title("DÉSIGNATION DU LOGEMENT"));
    html.push_str("<div style=\"margin-bottom: 14px;\">\n");
    html.push_str(&field_row("Appartement", &ctx.unit_number));
    html.push_str(&field_row("Chambres", &ctx.bedrooms));
    html.push_str(&field_row("Salles de bain", &ctx.bathrooms));
    html.push_str(&field_row(
        "Période",
        &format!(
            "du {} au {}",
            lease.start_date.format("%d/%m/%Y"),
            lease.end_date.format("%d/%m/%Y")
        ),
    ));
    html.push_str("</div>\n");

    // Amounts
    html.push_str(&amount_block(
        "Loyer mensuel",
        &ctx.rent_amount,
        &ctx.rent_amount_words,
    ));
    html.push_str(&amount_block(
        "Dépôt de garantie",
        &ctx.deposit_amount,
        &ctx.deposit_amount_words,
    ));

    // Bank details
    html.push_str(&section_title("COORDONNÉES BANCAIRES"));
    html.push_str("<div style=\"margin-bottom: 18px;\">\n");
    html.push_str(&field_row("Banque", &ctx.bank_name));
    html.push_str(&field_row("Numéro de compte", &ctx.bank_account));
    html.push_str("</div>\n");

    // Main clauses
    for clause in main_clauses {
        html.push_str(&clause_block(clause, &ctx));
    }

    // Annexes, behind a single forced page break
    if !annex_clauses.is_empty() {
        html.push_str(PAGE_BREAK_HTML);
        html.push('\n');
        html.push_str(&section_title("ANNEXES"));
        for clause in annex_clauses {
            html.push_str(&clause_block(clause, &ctx));
        }
    }

    // Signatures
    html.push_str(
        "<table style=\"width: 100%; margin-top: 48px; text-align: center; font-size: 13px;\">\n<tr>\n",
    );
    for role in ["Le Locataire", "Le Bailleur", "Le Témoin"] {
        html.push_str(&format!(
            "<td style=\"width: 33%; vertical-align: bottom;\">\
             <div style=\"border-top: 1px solid #1a1a1a; margin: 52px 26px 6px;\"></div>\
             <strong>{}</strong><br><em>« Lu et approuvé »</em></td>\n",
            role
        ));
    }
    html.push_str("</tr>\n</table>\n");

    // Footer
    html.push_str(&format!(
        "<div style=\"margin-top: 36px; padding-top: 10px; border-top: 1px solid #999; font-size: 11px; color: #555; text-align: center;\">\n\
         {} · {}<br>\n{} · {}\n</div>\n",
        landlord.full_name, landlord.address, ctx.bank_name, ctx.bank_account
    ));

    html.push_str("</body>\n</html>\n");
    html
}

fn section_title(title: &str) -> String {
    format!(
        "<h2 style=\"font-size: 15px; color: #1f3a5f; border-bottom: 1px solid #c9d4e4; padding-bottom: 4px; margin: 18px 0 10px;\">{}</h2>\n",
        title
    )
}

fn field_row(label: &str, value: &str) -> String {
    format!(
        "<p style=\"margin: 2px 0;\"><strong>{} :</strong> {}</p>\n",
        label, value
    )
}

fn amount_block(label: &str, figure: &str, words: &str) -> String {
    format!(
        "<div style=\"background: #eef3fb; border-left: 4px solid #1f3a5f; padding: 10px 14px; margin: 10px 0;\">\
         <strong>{} :</strong> {} € <em>({} euros)</em></div>\n",
        label, figure, words
    )
}

fn clause_block(clause: &ClauseRecord, ctx: &SubstitutionContext) -> String {
    format!(
        "<h3 style=\"font-size: 14px; margin: 16px 0 6px;\">{}</h3>\n<p style=\"margin: 0; text-align: justify;\">{}</p>\n",
        clause_heading(clause),
        multiline(&render(&clause.content, ctx))
    )
}

fn clause_heading(clause: &ClauseRecord) -> String {
    match clause.article_number {
        Some(n) => format!("Article {} — {}", n, clause.title),
        None => clause.title.clone(),
    }
}

fn multiline(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "<br>")
}

fn opt<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lease_types::PropertySnapshot;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn landlord() -> LandlordProfile {
        LandlordProfile {
            full_name: "Mme Claire Martin".to_string(),
            nationality: "Française".to_string(),
            passport_number: None,
            address: "12 rue des Lilas, 69003 Lyon".to_string(),
            bank_name: "Crédit Agricole".to_string(),
            bank_account: Some("FR76 1027 8060 4100 0205 4440 125".to_string()),
        }
    }

    fn tenant() -> TenantSnapshot {
        TenantSnapshot {
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            email: Some("jean.dupont@example.fr".to_string()),
            phone: None,
        }
    }

    fn lease() -> LeaseSnapshot {
        LeaseSnapshot {
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2027, 8, 31).unwrap(),
            rent_amount: 700.0,
            deposit_amount: None,
            property: PropertySnapshot {
                unit_number: "A3".to_string(),
                bedrooms: 2,
                bathrooms: 1,
            },
        }
    }

    fn clause(title: &str, content: &str, number: Option<u32>, annex: bool, idx: i32) -> ClauseRecord {
        ClauseRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            article_number: number,
            is_annex: annex,
            order_index: idx,
        }
    }

    fn options() -> RenderOptions {
        RenderOptions {
            building_name: "Résidence Les Oliviers".to_string(),
            fallback: UNSPECIFIED_FIELD.to_string(),
            issue_date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
        }
    }

    #[test]
    fn test_contract_number_is_unit_and_year() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        assert_eq!(contract_number("A3", date), "A3-2026");
    }

    #[test]
    fn test_jean_dupont_contract() {
        let main = [clause(
            "Objet du contrat",
            "Le bailleur loue l'appartement {{unit_number}} au locataire.\nLoyer: {{rent_amount}} euros ({{rent_amount_words}} euros).",
            Some(1),
            false,
            1,
        )];
        let annexes = [clause(
            "État des lieux",
            "L'état des lieux est annexé au présent contrat.",
            None,
            true,
            1,
        )];

        let html = assemble(
            &landlord(),
            &tenant(),
            &lease(),
            &main,
            &annexes,
            None,
            &options(),
        );

        // Deposit defaults to 3x rent and the rent is spelled in words
        assert!(html.contains("2100.00"));
        assert!(html.contains("sept cents"));
        assert!(html.contains("Jean Dupont"));
        assert!(html.contains("Contrat N° A3-2026"));
        assert!(html.contains("Article 1 — Objet du contrat"));
        // Exactly one page break, right before the annex section
        assert_eq!(html.matches(PAGE_BREAK_HTML).count(), 1);
        assert!(html.contains("ANNEXES"));
        assert!(html.contains("État des lieux"));
    }

    #[test]
    fn test_no_annexes_means_no_page_break() {
        let main = [clause("Durée", "Bail d'un an renouvelable.", Some(2), false, 2)];
        let html = assemble(&landlord(), &tenant(), &lease(), &main, &[], None, &options());
        assert_eq!(html.matches(PAGE_BREAK_HTML).count(), 0);
        assert!(!html.contains("ANNEXES"));
    }

    #[test]
    fn test_clause_newlines_become_breaks() {
        let main = [clause(
            "Obligations",
            "Payer le loyer.\nEntretenir le logement.",
            Some(3),
            false,
            3,
        )];
        let html = assemble(&landlord(), &tenant(), &lease(), &main, &[], None, &options());
        assert!(html.contains("Payer le loyer.<br>Entretenir le logement."));
    }

    #[test]
    fn test_missing_optionals_render_fallback() {
        let html = assemble(&landlord(), &tenant(), &lease(), &[], &[], None, &options());
        // passport_number and phone are absent
        assert!(html.contains("Non renseigné"));
        assert!(!html.contains("<strong>N° de passeport :</strong> </p>"));
    }

    #[test]
    fn test_heading_without_article_number_is_title_only() {
        let main = [clause("Clause particulière", "Texte libre.", None, false, 9)];
        let html = assemble(&landlord(), &tenant(), &lease(), &main, &[], None, &options());
        assert!(html.contains("<h3 style=\"font-size: 14px; margin: 16px 0 6px;\">Clause particulière</h3>"));
        assert!(!html.contains("Article  —"));
    }

    #[test]
    fn test_logo_embedded_as_data_uri() {
        let logo = LogoAsset {
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
            mime: "image/png".to_string(),
        };
        let html = assemble(
            &landlord(),
            &tenant(),
            &lease(),
            &[],
            &[],
            Some(&logo),
            &options(),
        );
        assert!(html.contains("src=\"data:image/png;base64,iVBORw==\""));
    }

    #[test]
    fn test_without_logo_slot_is_omitted() {
        let html = assemble(&landlord(), &tenant(), &lease(), &[], &[], None, &options());
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_explicit_deposit_is_used() {
        let mut lease = lease();
        lease.deposit_amount = Some(1500.0);
        let html = assemble(&landlord(), &tenant(), &lease, &[], &[], None, &options());
        assert!(html.contains("1500.00"));
        assert!(!html.contains("2100.00"));
    }

    #[test]
    fn test_three_signature_slots() {
        let html = assemble(&landlord(), &tenant(), &lease(), &[], &[], None, &options());
        for role in ["Le Locataire", "Le Bailleur", "Le Témoin"] {
            assert!(html.contains(role), "missing signature slot: {}", role);
        }
    }
}
