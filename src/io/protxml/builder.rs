use chrono::{DateTime, NaiveDateTime};
use log::{trace, warn};

use crate::model::{
    AffectedChannel, AnalysisResult, AnalysisSummary, Annotation, ContributingChannel,
    DecoyAnalysisSummary, ErrorPoint, FragmentMass, GroupHandle, IndistinguishablePeptide,
    IndistinguishableProtein, LibraIntensity, LibraQuant, LibraSummary, ModificationInfo,
    NspDistribution, NspInformation, Parameter, Peptide, Protein, ProteinGroup, ProteinHandle,
    ProteinProphetDetails, ProteinSummary, ResidueModification, StPeterQuant,
    StPeterQuantPeptide, StPeterSummary,
};

use super::context::{ContextEntry, ContextKind, ContextStack, ModificationTarget};
use super::reading_shared::{
    parse_float_lenient, parse_int_lenient, Attributes, ParserResult, ProtXMLParserState,
    ProtXMLSAX,
};

/// Overwrite `$target` with `$parse($value)` only when the attribute is present and non-empty
macro_rules! set_if_present {
    ($attrs:expr, $name:literal, $target:expr, $parse:expr) => {
        if let Some(value) = $attrs.get_nonempty($name) {
            $target = $parse(value);
        }
    };
}

/**
A SAX-style builder that appends every element it is told about to a [`ProteinSummary`].

Elements are attached to the most recently opened group, protein or peptide. Elements
whose parent is missing are dropped with a warning, as are closing tags that do not
match the innermost open peptide-like container. Neither stops the parse.
*/
#[derive(Debug, Default)]
pub struct ProteinSummaryBuilder {
    pub document: ProteinSummary,
    context: ContextStack,
    current_group: Option<GroupHandle>,
    current_protein: Option<ProteinHandle>,
    /// Whether the open `modification_info` block has received residue masses
    has_residue_modifications: bool,
    warnings: usize,
}

impl ProteinSummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything built so far
    pub fn reset(&mut self) {
        self.document.clear();
        self.context.clear();
        self.current_group = None;
        self.current_protein = None;
        self.has_residue_modifications = false;
        self.warnings = 0;
    }

    /// The number of structural-consistency warnings raised so far
    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn context(&self) -> &ContextStack {
        &self.context
    }

    pub fn into_document(self) -> ProteinSummary {
        self.document
    }

    fn structural_warning(&mut self, message: std::fmt::Arguments) {
        self.warnings += 1;
        warn!("{message}");
    }

    fn missing_parent(&mut self, element: &str, parent: &str) {
        self.structural_warning(format_args!(
            "{element} found outside of {parent}, skipping it"
        ));
    }

    fn current_protein_mut(&mut self) -> Option<&mut Protein> {
        self.current_protein
            .and_then(|h| self.document.protein_mut(h))
    }

    fn last_analysis_summary_mut(&mut self) -> Option<&mut AnalysisSummary> {
        self.document.summary.analysis_summaries.last_mut()
    }

    fn last_libra_summary_mut(&mut self) -> Option<&mut LibraSummary> {
        self.last_analysis_summary_mut()
            .and_then(|a| a.libra.last_mut())
    }

    fn last_libra_quant_mut(&mut self) -> Option<&mut LibraQuant> {
        self.current_protein_mut()
            .and_then(|p| p.analysis_results.last_mut())
            .and_then(|r| r.libra.last_mut())
    }

    fn modification_info_mut(&mut self, target: ModificationTarget) -> Option<&mut ModificationInfo> {
        match target {
            ModificationTarget::Peptide(handle) => self
                .document
                .peptide_mut(handle)
                .map(|p| &mut p.modification_info),
            ModificationTarget::IndistinguishablePeptide(handle) => self
                .document
                .indistinguishable_peptide_mut(handle)
                .map(|p| &mut p.modification_info),
        }
    }

    fn start_summary_header(&mut self, attrs: &Attributes) {
        let summary = &mut self.document.summary;
        summary.source_files = split_source_files(attrs.get("source_files"));
        summary.reference_database = attrs.get("reference_database").to_string();
        summary.sample_enzyme = attrs.get("sample_enzyme").to_string();
        summary.min_peptide_probability = attrs.float("min_peptide_probability");
        summary.min_peptide_weight = attrs.float("min_peptide_weight");
        summary.num_predicted_correct_prots = attrs.float("num_predicted_correct_prots");
        summary.total_no_spectrum_ids = attrs.float("total_no_spectrum_ids");
    }

    fn start_program_details(&mut self, attrs: &Attributes) {
        let summary = &mut self.document.summary;
        summary.algorithm_name = attrs.get("analysis").to_string();
        summary.version = attrs.get("version").to_string();
        summary.time = attrs.get_nonempty("time").and_then(parse_time);
    }

    fn start_proteinprophet_details(&mut self, attrs: &Attributes) {
        self.document.summary.proteinprophet_details = Some(ProteinProphetDetails {
            occam_flag: attrs.flag("occam_flag"),
            groups_flag: attrs.flag("groups_flag"),
            degen_flag: attrs.flag("degen_flag"),
            nsp_flag: attrs.flag("nsp_flag"),
            fpkm_flag: attrs.flag("fpkm_flag"),
            initial_peptide_wt_iters: attrs.int("initial_peptide_wt_iters"),
            nsp_distribution_iters: attrs.int("nsp_distribution_iters"),
            final_peptide_wt_iters: attrs.int("final_peptide_wt_iters"),
            run_options: attrs.get("run_options").to_string(),
            nsp_information: None,
        });
    }

    fn start_nsp_information(&mut self, attrs: &Attributes) {
        let info = NspInformation {
            neighboring_bin_smoothing: attrs.flag("neighboring_bin_smoothing"),
            distribution: Vec::new(),
        };
        match self.document.summary.proteinprophet_details.as_mut() {
            Some(details) => details.nsp_information = Some(info),
            None => self.missing_parent("nsp_information", "proteinprophet_details"),
        }
    }

    fn start_nsp_distribution(&mut self, attrs: &Attributes) {
        let bin = NspDistribution {
            bin_no: attrs.int("bin_no"),
            nsp_lower_bound_incl: attrs.float("nsp_lower_bound_incl"),
            nsp_lower_bound_excl: attrs.float("nsp_lower_bound_excl"),
            nsp_upper_bound_incl: attrs.get("nsp_upper_bound_incl").to_string(),
            nsp_upper_bound_excl: attrs.get("nsp_upper_bound_excl").to_string(),
            pos_freq: attrs.float("pos_freq"),
            neg_freq: attrs.float("neg_freq"),
            pos_to_neg_ratio: attrs.float("pos_to_neg_ratio"),
            alt_pos_to_neg_ratio: attrs.float("alt_pos_to_neg_ratio"),
        };
        match self
            .document
            .summary
            .proteinprophet_details
            .as_mut()
            .and_then(|d| d.nsp_information.as_mut())
        {
            Some(info) => info.distribution.push(bin),
            None => self.missing_parent("nsp_distribution", "nsp_information"),
        }
    }

    /// The older form of `protein_summary_data_filter`
    fn start_error_point(&mut self, attrs: &Attributes) {
        self.document.summary.error_points.push(ErrorPoint {
            min_probability: attrs.float("min_prob"),
            sensitivity: 0.0,
            false_positive_error_rate: attrs.float("error"),
            predicted_num_correct: attrs.float("num_corr"),
            predicted_num_incorrect: attrs.float("num_incorr"),
        });
    }

    fn start_analysis_summary(&mut self, attrs: &Attributes) {
        self.document.summary.analysis_summaries.push(AnalysisSummary {
            analysis: attrs.get("analysis").to_string(),
            id: attrs.int("id"),
            time: attrs.get_nonempty("time").and_then(parse_time),
            ..Default::default()
        });
    }

    fn start_libra_summary(&mut self, attrs: &Attributes) {
        let summary = LibraSummary {
            version: attrs.get("version").to_string(),
            channel_code: attrs.get("channel_code").to_string(),
            mass_tolerance: attrs.float("mass_tolerance"),
            centroiding_preference: attrs.int("centroiding_preference"),
            normalization: attrs.int("normalization"),
            output_type: attrs.int("output_type"),
            min_pep_prob: attrs.float("min_pep_prob"),
            min_pep_wt: attrs.float("min_pep_wt"),
            min_prot_prob: attrs.float("min_prot_prob"),
            ..Default::default()
        };
        match self.last_analysis_summary_mut() {
            Some(analysis) => analysis.libra.push(summary),
            None => self.missing_parent("libra_summary", "an analysis_summary"),
        }
    }

    fn start_fragment_masses(&mut self, attrs: &Attributes) {
        let mass = FragmentMass {
            channel: attrs.int("channel"),
            mz: attrs.float("mz"),
        };
        match self.last_libra_summary_mut() {
            Some(summary) => summary.fragment_masses.push(mass),
            None => self.missing_parent("fragment_masses", "a libra_summary"),
        }
    }

    fn start_contributing_channel(&mut self, attrs: &Attributes) {
        let channel = ContributingChannel {
            channel: attrs.int("channel"),
            affected_channels: Vec::new(),
        };
        match self.last_libra_summary_mut() {
            Some(summary) => summary.isotopic_contributions.push(channel),
            None => self.missing_parent("contributing_channel", "a libra_summary"),
        }
    }

    fn start_affected_channel(&mut self, attrs: &Attributes) {
        let affected = AffectedChannel {
            channel: attrs.int("channel"),
            correction: attrs.float("correction"),
        };
        match self
            .last_libra_summary_mut()
            .and_then(|s| s.isotopic_contributions.last_mut())
        {
            Some(contributing) => contributing.affected_channels.push(affected),
            None => self.missing_parent("affected_channel", "a contributing_channel"),
        }
    }

    fn start_decoy_analysis_summary(&mut self, attrs: &Attributes) {
        let decoy = DecoyAnalysisSummary {
            decoy_ratio: attrs.float("decoy_ratio"),
            decoy_string: attrs.get("decoy_string").to_string(),
            exclude_string: attrs.get("exclude_string").to_string(),
            use_confidence: attrs.get("use_confidence").to_string(),
        };
        match self.last_analysis_summary_mut() {
            Some(analysis) => analysis.decoy_analysis.push(decoy),
            None => self.missing_parent("decoy_analysis_summary", "an analysis_summary"),
        }
    }

    fn start_analysis_result(&mut self, attrs: &Attributes) {
        let result = AnalysisResult {
            analysis: attrs.get("analysis").to_string(),
            id: attrs.int("id"),
            libra: Vec::new(),
        };
        match self.current_protein_mut() {
            Some(protein) => protein.analysis_results.push(result),
            None => self.missing_parent("analysis_result", "a protein"),
        }
    }

    fn start_libra_result(&mut self, attrs: &Attributes) {
        let quant = LibraQuant {
            number: attrs.int("number"),
            intensities: Vec::new(),
        };
        match self
            .current_protein_mut()
            .and_then(|p| p.analysis_results.last_mut())
        {
            Some(result) => result.libra.push(quant),
            None => self.missing_parent("libra_result", "an analysis_result"),
        }
    }

    fn start_intensity(&mut self, attrs: &Attributes) {
        let intensity = LibraIntensity {
            channel: attrs.int("channel"),
            mz: attrs.float("mz"),
            ratio: attrs.float("ratio"),
            error: attrs.float("error"),
        };
        match self.last_libra_quant_mut() {
            Some(quant) => quant.intensities.push(intensity),
            None => self.missing_parent("intensity", "a libra_result"),
        }
    }

    fn start_data_filter(&mut self, attrs: &Attributes) {
        self.document.summary.error_points.push(ErrorPoint {
            min_probability: attrs.float("min_probability"),
            sensitivity: attrs.float("sensitivity"),
            false_positive_error_rate: attrs.float("false_positive_error_rate"),
            predicted_num_correct: attrs.float("predicted_num_correct"),
            predicted_num_incorrect: attrs.float("predicted_num_incorrect"),
        });
    }

    fn start_stpeter_summary(&mut self, attrs: &Attributes) {
        let summary = self
            .document
            .summary
            .stpeter
            .get_or_insert_with(StPeterSummary::default);
        set_if_present!(attrs, "version", summary.version, str::to_string);
        set_if_present!(attrs, "probability", summary.probability, parse_float_lenient);
        set_if_present!(attrs, "FDR", summary.fdr, parse_float_lenient);
        set_if_present!(attrs, "sampleLoad", summary.sample_load, parse_float_lenient);
        set_if_present!(attrs, "tolerance", summary.tolerance, parse_float_lenient);
        set_if_present!(
            attrs,
            "degenerate_peptides",
            summary.degenerate_peptides,
            is_yes
        );
    }

    fn start_group(&mut self, attrs: &Attributes) {
        let group = ProteinGroup {
            group_number: attrs.int("group_number"),
            probability: attrs.float("probability"),
            pseudo_name: attrs.get("pseudo_name").to_string(),
            proteins: Vec::new(),
        };
        self.current_group = Some(self.document.push_group(group));
        self.current_protein = None;
    }

    fn start_protein(&mut self, attrs: &Attributes) {
        let protein = Protein {
            name: attrs.get("protein_name").to_string(),
            probability: attrs.float("probability"),
            percent_coverage: attrs.float("percent_coverage"),
            pct_spectrum_ids: attrs.float("pct_spectrum_ids"),
            confidence: attrs.float("confidence"),
            n_indistinguishable_proteins: attrs.int("n_indistinguishable_proteins"),
            total_number_peptides: attrs.int("total_number_peptides"),
            total_number_distinct_peptides: attrs.int("total_number_distinct_peptides"),
            group_sibling_id: attrs.get("group_sibling_id").to_string(),
            subsuming_protein_entry: attrs.get("subsuming_protein_entry").to_string(),
            unique_stripped_peptides: attrs
                .get("unique_stripped_peptides")
                .split('+')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            ..Default::default()
        };
        if protein.name.is_empty() {
            self.structural_warning(format_args!("protein without a protein_name"));
        }
        self.current_protein = self
            .current_group
            .and_then(|group| self.document.push_protein(group, protein));
        if self.current_protein.is_none() {
            self.structural_warning(format_args!(
                "protein found outside of a protein_group, skipping it"
            ));
        }
    }

    fn start_indistinguishable_protein(&mut self, attrs: &Attributes) {
        let protein = IndistinguishableProtein {
            name: attrs.get("protein_name").to_string(),
            ..Default::default()
        };
        let handle = self
            .current_protein
            .and_then(|parent| self.document.push_indistinguishable_protein(parent, protein));
        if handle.is_none() {
            self.structural_warning(format_args!(
                "indistinguishable_protein found outside of a protein, skipping it"
            ));
        }
        self.context
            .push(ContextEntry::IndistinguishableProtein(handle));
    }

    fn start_annotation(&mut self, attrs: &Attributes) {
        let annotation = Annotation {
            protein_description: attrs.get("protein_description").to_string(),
            ipi_name: attrs.get("ipi_name").to_string(),
            refseq_name: attrs.get("refseq_name").to_string(),
            swissprot_name: attrs.get("swissprot_name").to_string(),
            trembl_name: attrs.get("trembl_name").to_string(),
            ensembl_name: attrs.get("ensembl_name").to_string(),
            locus_link_name: attrs.get("locus_link_name").to_string(),
            flybase: attrs.get("flybase").to_string(),
        };
        let top = self.context.top().copied();
        let target = match top {
            Some(ContextEntry::IndistinguishableProtein(handle)) => handle
                .and_then(|h| self.document.indistinguishable_protein_mut(h))
                .map(|p| &mut p.annotation),
            _ => self.current_protein_mut().map(|p| &mut p.annotation),
        };
        match target {
            Some(target) => *target = annotation,
            None => trace!("Skipping annotation without an owner"),
        }
    }

    fn start_parameter(&mut self, attrs: &Attributes) {
        let parameter = Parameter::new(
            attrs.get("name").to_string(),
            attrs.get("value").to_string(),
            attrs.get("type").to_string(),
        );
        let parameters = match self.context.top().copied() {
            Some(ContextEntry::IndistinguishableProtein(handle)) => handle
                .and_then(|h| self.document.indistinguishable_protein_mut(h))
                .map(|p| &mut p.parameters),
            Some(ContextEntry::Peptide(handle)) => handle
                .and_then(|h| self.document.peptide_mut(h))
                .map(|p| &mut p.parameters),
            Some(ContextEntry::IndistinguishablePeptide(_)) => None,
            None => self
                .current_protein
                .and_then(|h| self.document.protein_mut(h))
                .map(|p| &mut p.parameters),
        };
        match parameters {
            Some(parameters) => parameters.push(parameter),
            None => trace!("Skipping parameter {} without an owner", parameter.name),
        }
    }

    fn start_peptide(&mut self, attrs: &Attributes) {
        let peptide = Peptide {
            sequence: attrs.get("peptide_sequence").to_string(),
            charge: attrs.int("charge"),
            initial_probability: attrs.float("initial_probability"),
            nsp_adjusted_probability: attrs.float("nsp_adjusted_probability"),
            ni_adjusted_probability: attrs.float("ni_adjusted_probability"),
            fpkm_adjusted_probability: attrs.float("fpkm_adjusted_probability"),
            weight: attrs.float("weight"),
            n_sibling_peptides: attrs.float("n_sibling_peptides"),
            exp_tot_instances: attrs.float("exp_tot_instances"),
            calc_neutral_mass: attrs.float("calc_neutral_pep_mass"),
            n_enzymatic_termini: attrs.int("n_enzymatic_termini"),
            n_sibling_peptides_bin: attrs.int("n_sibling_peptides_bin"),
            n_instances: attrs.int("n_instances"),
            is_nondegenerate_evidence: attrs.flag("is_nondegenerate_evidence"),
            is_contributing_evidence: attrs.flag("is_contributing_evidence"),
            peptide_group_designator: attrs.get("peptide_group_designator").to_string(),
            ..Default::default()
        };
        if peptide.sequence.is_empty() {
            self.structural_warning(format_args!("peptide without a peptide_sequence"));
        }
        let handle = self
            .current_protein
            .and_then(|parent| self.document.push_peptide(parent, peptide));
        if handle.is_none() {
            self.structural_warning(format_args!(
                "peptide found outside of a protein, skipping it"
            ));
        }
        self.context.push(ContextEntry::Peptide(handle));
    }

    fn start_peptide_parent_protein(&mut self, attrs: &Attributes) {
        if let Some(peptide) = self
            .context
            .current_peptide()
            .and_then(|h| self.document.peptide_mut(h))
        {
            peptide
                .parent_proteins
                .push(attrs.get("protein_name").to_string());
        }
    }

    fn start_indistinguishable_peptide(&mut self, attrs: &Attributes) {
        let peptide = IndistinguishablePeptide {
            sequence: attrs.get("peptide_sequence").to_string(),
            charge: attrs.int("charge"),
            calc_neutral_mass: attrs.float("calc_neutral_pep_mass"),
            modification_info: ModificationInfo::default(),
        };
        let parent = match self.context.top() {
            Some(ContextEntry::Peptide(handle)) => *handle,
            _ => None,
        };
        let handle =
            parent.and_then(|parent| self.document.push_indistinguishable_peptide(parent, peptide));
        if handle.is_none() {
            self.structural_warning(format_args!(
                "indistinguishable_peptide found outside of a peptide, skipping it"
            ));
        }
        self.context
            .push(ContextEntry::IndistinguishablePeptide(handle));
    }

    fn start_modification_info(&mut self, attrs: &Attributes) {
        self.has_residue_modifications = false;
        let Some(target) = self.context.modification_target() else {
            self.structural_warning(format_args!(
                "modification_info found outside of a peptide, skipping it"
            ));
            return;
        };
        if let Some(info) = self.modification_info_mut(target) {
            info.modified_peptide = attrs.get("modified_peptide").to_string();
            info.n_terminal_mass = attrs.float("mod_nterm_mass");
            info.c_terminal_mass = attrs.float("mod_cterm_mass");
        }
    }

    fn start_mod_aminoacid_mass(&mut self, attrs: &Attributes) {
        let modification = ResidueModification::new(attrs.int("position"), attrs.float("mass"));
        let Some(info) = self
            .context
            .modification_target()
            .and_then(|target| self.modification_info_mut(target))
        else {
            self.structural_warning(format_args!(
                "mod_aminoacid_mass found outside of a peptide, skipping it"
            ));
            return;
        };
        if info.modification_at(modification.position).is_some() {
            trace!(
                "Residue {} already has a mass, {} will not be rendered",
                modification.position,
                modification.mass
            );
        }
        info.residue_modifications.push(modification);
        self.has_residue_modifications = true;
    }

    fn end_modification_info(&mut self) {
        if !std::mem::take(&mut self.has_residue_modifications) {
            return;
        }
        match self.context.modification_target() {
            Some(ModificationTarget::Peptide(handle)) => {
                if let Some(peptide) = self.document.peptide_mut(handle) {
                    peptide.modification_info.modified_peptide = peptide
                        .modification_info
                        .synthesize_modified_peptide(&peptide.sequence);
                }
            }
            Some(ModificationTarget::IndistinguishablePeptide(handle)) => {
                if let Some(peptide) = self.document.indistinguishable_peptide_mut(handle) {
                    peptide.modification_info.modified_peptide = peptide
                        .modification_info
                        .synthesize_modified_peptide(&peptide.sequence);
                }
            }
            None => {}
        }
    }

    fn current_quant_mut(&mut self) -> Option<&mut StPeterQuant> {
        self.current_protein
            .and_then(|h| self.document.protein_mut(h))
            .map(|p| p.quant.get_or_insert_with(StPeterQuant::default))
    }

    fn start_stpeter_quant(&mut self, attrs: &Attributes) {
        let Some(quant) = self.current_quant_mut() else {
            self.structural_warning(format_args!(
                "StPeterQuant found outside of a protein, skipping it"
            ));
            return;
        };
        set_if_present!(attrs, "SI", quant.si, parse_float_lenient);
        set_if_present!(attrs, "SIn", quant.sin, parse_float_lenient);
        set_if_present!(attrs, "NSAF", quant.nsaf, parse_float_lenient);
        set_if_present!(attrs, "ng", quant.ng, parse_float_lenient);
        set_if_present!(attrs, "ngC", quant.ng_counts, parse_float_lenient);
        set_if_present!(attrs, "counts", quant.counts, parse_int_lenient);
        set_if_present!(attrs, "dSI", quant.d_si, parse_float_lenient);
        set_if_present!(attrs, "dSIn", quant.d_sin, parse_float_lenient);
        set_if_present!(attrs, "dNSAF", quant.d_nsaf, parse_float_lenient);
        set_if_present!(attrs, "dCounts", quant.d_counts, parse_float_lenient);
    }

    fn start_stpeter_quant_peptide(&mut self, attrs: &Attributes) {
        let mut row = StPeterQuantPeptide::default();
        set_if_present!(attrs, "sequence", row.sequence, str::to_string);
        set_if_present!(attrs, "charge", row.charge, parse_int_lenient);
        set_if_present!(attrs, "SI", row.intensity, parse_float_lenient);
        set_if_present!(attrs, "SC", row.count, parse_int_lenient);
        set_if_present!(attrs, "dSI", row.d_intensity, parse_float_lenient);
        set_if_present!(attrs, "dSC", row.d_count, parse_float_lenient);
        match self.current_quant_mut() {
            Some(quant) => quant.peptides.push(row),
            None => self.structural_warning(format_args!(
                "StPeterQuant_peptide found outside of a protein, skipping it"
            )),
        }
    }

    fn close_context(&mut self, expected: ContextKind) {
        if let Err(mismatch) = self.context.pop(expected) {
            self.structural_warning(format_args!("Error in elements: {mismatch}"));
        }
    }

    /// The state to fall back to once the innermost container closes
    fn enclosing_state(&self) -> ProtXMLParserState {
        match self.context.top() {
            Some(ContextEntry::Peptide(_)) => ProtXMLParserState::Peptide,
            Some(ContextEntry::IndistinguishablePeptide(_)) => {
                ProtXMLParserState::IndistinguishablePeptide
            }
            Some(ContextEntry::IndistinguishableProtein(_)) => {
                ProtXMLParserState::IndistinguishableProtein
            }
            None if self.current_protein.is_some() => ProtXMLParserState::Protein,
            None => ProtXMLParserState::ProteinGroup,
        }
    }
}

impl ProtXMLSAX for ProteinSummaryBuilder {
    fn start_element(
        &mut self,
        name: &str,
        attributes: &Attributes,
        state: ProtXMLParserState,
    ) -> ParserResult {
        let next = match name {
            "protein_summary" => ProtXMLParserState::ProteinSummary,
            "protein_summary_header" => {
                self.start_summary_header(attributes);
                ProtXMLParserState::ProteinSummaryHeader
            }
            "program_details" => {
                self.start_program_details(attributes);
                ProtXMLParserState::ProgramDetails
            }
            "proteinprophet_details" => {
                self.start_proteinprophet_details(attributes);
                ProtXMLParserState::ProteinProphetDetails
            }
            "nsp_information" => {
                self.start_nsp_information(attributes);
                state
            }
            "nsp_distribution" => {
                self.start_nsp_distribution(attributes);
                state
            }
            "protein_summary_data_filter" => {
                self.start_data_filter(attributes);
                state
            }
            "error_point" => {
                self.start_error_point(attributes);
                state
            }
            "dataset_derivation" => {
                self.document.summary.dataset_generation =
                    Some(attributes.get("generation_no").to_string());
                state
            }
            "analysis_summary" => {
                self.start_analysis_summary(attributes);
                ProtXMLParserState::AnalysisSummary
            }
            "libra_summary" => {
                self.start_libra_summary(attributes);
                ProtXMLParserState::LibraSummary
            }
            "fragment_masses" => {
                self.start_fragment_masses(attributes);
                state
            }
            "contributing_channel" => {
                self.start_contributing_channel(attributes);
                state
            }
            "affected_channel" => {
                self.start_affected_channel(attributes);
                state
            }
            "decoy_analysis_summary" => {
                self.start_decoy_analysis_summary(attributes);
                state
            }
            "analysis_result" => {
                self.start_analysis_result(attributes);
                ProtXMLParserState::AnalysisResult
            }
            "libra_result" => {
                self.start_libra_result(attributes);
                ProtXMLParserState::LibraResult
            }
            "intensity" => {
                self.start_intensity(attributes);
                state
            }
            "StPeter_analysis_summary" => {
                self.start_stpeter_summary(attributes);
                state
            }
            "protein_group" => {
                self.start_group(attributes);
                ProtXMLParserState::ProteinGroup
            }
            "protein" => {
                self.start_protein(attributes);
                ProtXMLParserState::Protein
            }
            "indistinguishable_protein" => {
                self.start_indistinguishable_protein(attributes);
                ProtXMLParserState::IndistinguishableProtein
            }
            "annotation" => {
                self.start_annotation(attributes);
                ProtXMLParserState::Annotation
            }
            "parameter" => {
                self.start_parameter(attributes);
                ProtXMLParserState::Parameter
            }
            "peptide" => {
                self.start_peptide(attributes);
                ProtXMLParserState::Peptide
            }
            "peptide_parent_protein" => {
                self.start_peptide_parent_protein(attributes);
                ProtXMLParserState::PeptideParentProtein
            }
            "indistinguishable_peptide" => {
                self.start_indistinguishable_peptide(attributes);
                ProtXMLParserState::IndistinguishablePeptide
            }
            "modification_info" => {
                self.start_modification_info(attributes);
                ProtXMLParserState::ModificationInfo
            }
            "mod_aminoacid_mass" => {
                self.start_mod_aminoacid_mass(attributes);
                ProtXMLParserState::ModAminoAcidMass
            }
            "StPeterQuant" => {
                self.start_stpeter_quant(attributes);
                ProtXMLParserState::StPeterQuant
            }
            "StPeterQuant_peptide" => {
                self.start_stpeter_quant_peptide(attributes);
                ProtXMLParserState::StPeterQuantPeptide
            }
            _ => {
                trace!("Skipping element {name} in {state:?}");
                state
            }
        };
        Ok(next)
    }

    fn end_element(&mut self, name: &str, state: ProtXMLParserState) -> ParserResult {
        let next = match name {
            "protein_summary" => ProtXMLParserState::Done,
            "protein_summary_header" | "analysis_summary" => ProtXMLParserState::ProteinSummary,
            "program_details" => ProtXMLParserState::ProteinSummaryHeader,
            "proteinprophet_details" => ProtXMLParserState::ProgramDetails,
            "protein_group" => ProtXMLParserState::ProteinSummary,
            "protein" => ProtXMLParserState::ProteinGroup,
            "libra_summary" => ProtXMLParserState::AnalysisSummary,
            "analysis_result" => ProtXMLParserState::Protein,
            "libra_result" => ProtXMLParserState::AnalysisResult,
            "peptide" => {
                self.close_context(ContextKind::Peptide);
                self.enclosing_state()
            }
            "indistinguishable_peptide" => {
                self.close_context(ContextKind::IndistinguishablePeptide);
                self.enclosing_state()
            }
            "indistinguishable_protein" => {
                self.close_context(ContextKind::IndistinguishableProtein);
                self.enclosing_state()
            }
            "modification_info" => {
                self.end_modification_info();
                self.enclosing_state()
            }
            "annotation" | "parameter" | "peptide_parent_protein" | "mod_aminoacid_mass"
            | "StPeterQuant" | "StPeterQuant_peptide" => self.enclosing_state(),
            _ => state,
        };
        Ok(next)
    }

    fn characters(&mut self, _text: &[u8], state: ProtXMLParserState) -> ParserResult {
        Ok(state)
    }
}

/// Split the `source_files` attribute on single spaces, always keeping the final token
fn split_source_files(value: &str) -> Vec<String> {
    value.split(' ').map(String::from).collect()
}

fn is_yes(value: &str) -> bool {
    value.eq_ignore_ascii_case("yes")
}

fn parse_time(value: &str) -> Option<NaiveDateTime> {
    value
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|t| t.naive_utc())
        })
}
