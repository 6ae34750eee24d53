use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    error::DstError,
    triple::{Triple, split_request_inform},
    utils::{load_json, write_json_to_file},
};

/// Predictions and gold annotations for one turn of the model output.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TurnRecord {
    pub preds: Vec<Triple>,
    pub labels: Vec<Triple>,
    pub belief_state: Vec<Triple>, // gold state for joint goal
}

/// dialogue id -> turn id -> turn record
pub type ModelOutput = IndexMap<String, IndexMap<String, TurnRecord>>;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DstMetrics {
    pub turn_inform: f64,
    pub turn_request: f64,
    pub joint_goal: f64,
}

/// Classified triples of a single turn, kept for inspecting mistakes.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TurnInspection {
    pub pred_inform: Vec<Triple>,
    pub gold_inform: Vec<Triple>,
    pub pred_request: Vec<Triple>,
    pub gold_request: Vec<Triple>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EvaluationReport {
    pub metrics: DstMetrics,
    pub turns: IndexMap<String, IndexMap<String, TurnInspection>>,
}

/// Per-turn outcome of the three comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnScore {
    pub inform: bool,
    pub request: bool,
    pub joint_goal: bool,
}

pub fn score_turn(turn: &TurnRecord) -> (TurnScore, TurnInspection) {
    let (gold_request, gold_inform) = split_request_inform(&turn.labels);
    let (pred_request, pred_inform) = split_request_inform(&turn.preds);

    // keep inform intents only, general intents are not part of the goal
    let pred_recovered: IndexSet<&Triple> =
        pred_inform.iter().filter(|t| !t.is_general()).collect();
    let gold_recovered: IndexSet<&Triple> = turn.belief_state.iter().collect();

    let score = TurnScore {
        inform: gold_inform == pred_inform,
        request: gold_request == pred_request,
        joint_goal: pred_recovered == gold_recovered,
    };
    let inspection = TurnInspection {
        pred_inform: pred_inform.into_iter().collect(),
        gold_inform: gold_inform.into_iter().collect(),
        pred_request: pred_request.into_iter().collect(),
        gold_request: gold_request.into_iter().collect(),
    };
    (score, inspection)
}

fn rounded_mean(scores: &[bool]) -> f64 {
    let hits = scores.iter().filter(|&&s| s).count();
    let mean = hits as f64 / scores.len() as f64;
    // ties go to even, e.g. 1/16 -> 0.062
    (mean * 1000.0).round_ties_even() / 1000.0
}

/// Averages turn inform, turn request and joint goal accuracy over every turn
/// of every dialogue. Fails with [`DstError::NoTurns`] when there is nothing to average.
pub fn eval_metrics(model_output: &ModelOutput) -> Result<EvaluationReport, DstError> {
    let mut inform = Vec::new();
    let mut request = Vec::new();
    let mut joint_goal = Vec::new();
    let mut turns = IndexMap::new();

    for (dialogue_idx, dialogue) in model_output.iter() {
        let mut turn_dict = IndexMap::new();
        for (turn_id, turn) in dialogue.iter() {
            let (score, inspection) = score_turn(turn);
            debug!(
                "Dialogue {} turn {}: inform={} request={} joint_goal={}",
                dialogue_idx, turn_id, score.inform, score.request, score.joint_goal
            );
            inform.push(score.inform);
            request.push(score.request);
            joint_goal.push(score.joint_goal);
            turn_dict.insert(turn_id.clone(), inspection);
        }
        turns.insert(dialogue_idx.clone(), turn_dict);
    }

    if inform.is_empty() {
        return Err(DstError::NoTurns);
    }

    let metrics = DstMetrics {
        turn_inform: rounded_mean(&inform),
        turn_request: rounded_mean(&request),
        joint_goal: rounded_mean(&joint_goal),
    };
    Ok(EvaluationReport { metrics, turns })
}

/// Evaluates a model output file and optionally stores the full report next to it.
pub fn evaluate_model_output_file(
    model_output_path: impl AsRef<Path>,
    report_path: Option<&Path>,
) -> Result<EvaluationReport, DstError> {
    let model_output: ModelOutput = load_json(model_output_path.as_ref())?;
    let report = eval_metrics(&model_output)?;
    info!(
        "Evaluated {} dialogues | turn_inform: {} | turn_request: {} | joint_goal: {}",
        model_output.len(),
        report.metrics.turn_inform,
        report.metrics.turn_request,
        report.metrics.joint_goal
    );
    if let Some(report_path) = report_path {
        write_json_to_file(report_path, &report)?;
        info!("Wrote evaluation report to {}", report_path.display());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(d: &str, s: &str, v: &str) -> Triple {
        Triple::new(d, s, v)
    }

    fn output_of(turns: Vec<(&str, &str, TurnRecord)>) -> ModelOutput {
        let mut output = ModelOutput::new();
        for (dialogue_idx, turn_id, record) in turns {
            output
                .entry(dialogue_idx.to_string())
                .or_default()
                .insert(turn_id.to_string(), record);
        }
        output
    }

    #[test]
    fn identical_predictions_score_perfectly() {
        let triples = vec![t("餐馆", "名称", "海底捞")];
        let record = TurnRecord {
            preds: triples.clone(),
            labels: triples.clone(),
            belief_state: triples,
        };
        let report = eval_metrics(&output_of(vec![("1", "0", record)])).unwrap();
        assert_eq!(
            report.metrics,
            DstMetrics {
                turn_inform: 1.0,
                turn_request: 1.0,
                joint_goal: 1.0
            }
        );
    }

    #[test]
    fn disjoint_predictions_score_zero() {
        let record = TurnRecord {
            preds: vec![t("餐馆-名称", "名称", "海底捞"), t("餐馆-评分", "Request", "")],
            labels: vec![t("酒店-名称", "名称", "如家"), t("酒店-电话", "Request", "")],
            belief_state: vec![t("酒店-名称", "名称", "如家")],
        };
        let report = eval_metrics(&output_of(vec![("1", "0", record)])).unwrap();
        assert_eq!(report.metrics.turn_inform, 0.0);
        assert_eq!(report.metrics.turn_request, 0.0);
        assert_eq!(report.metrics.joint_goal, 0.0);
    }

    #[test]
    fn general_intents_are_ignored_for_joint_goal() {
        let goal = t("餐馆", "名称", "海底捞");
        let general = t("餐馆", "none", "none");
        let record = TurnRecord {
            preds: vec![goal.clone(), general.clone()],
            labels: vec![goal.clone(), general],
            belief_state: vec![goal],
        };
        let report = eval_metrics(&output_of(vec![("1", "0", record)])).unwrap();
        assert_eq!(report.metrics.joint_goal, 1.0);
        assert_eq!(report.metrics.turn_inform, 1.0);
    }

    #[test]
    fn only_slot_and_value_both_none_count_as_general() {
        let goal = t("餐馆", "名称", "海底捞");
        let record = TurnRecord {
            preds: vec![goal.clone(), t("餐馆", "评分", "none")],
            labels: vec![],
            belief_state: vec![goal],
        };
        let (score, _) = score_turn(&record);
        assert!(!score.joint_goal);
    }

    #[test]
    fn order_and_duplicates_do_not_matter() {
        let a = t("酒店-价格", "价格", "200");
        let b = t("酒店-评分", "评分", "4.5");
        let record = TurnRecord {
            preds: vec![b.clone(), a.clone(), a.clone()],
            labels: vec![a.clone(), b.clone()],
            belief_state: vec![a, b],
        };
        let (score, inspection) = score_turn(&record);
        assert_eq!(
            score,
            TurnScore {
                inform: true,
                request: true,
                joint_goal: true
            }
        );
        assert_eq!(inspection.pred_inform.len(), 2);
    }

    #[test]
    fn averages_across_dialogues_and_rounds() {
        let good = t("景点-名称", "名称", "故宫");
        let bad = t("景点-名称", "名称", "天坛");
        let hit = TurnRecord {
            preds: vec![good.clone()],
            labels: vec![good.clone()],
            belief_state: vec![good.clone()],
        };
        let miss = TurnRecord {
            preds: vec![bad],
            labels: vec![good.clone()],
            belief_state: vec![good],
        };
        let output = output_of(vec![
            ("a", "0", hit.clone()),
            ("a", "1", miss),
            ("b", "0", hit),
        ]);
        let report = eval_metrics(&output).unwrap();
        assert_eq!(report.metrics.turn_inform, 0.667);
        assert_eq!(report.metrics.turn_request, 1.0);
        assert_eq!(report.metrics.joint_goal, 0.667);
        assert_eq!(report.turns["a"].len(), 2);
        assert_eq!(report.turns["b"]["0"].gold_inform.len(), 1);
    }

    fn joint_goal_over_sixteen_turns(hits: usize) -> f64 {
        let gold = t("酒店-名称", "名称", "如家");
        let wrong = t("酒店-名称", "名称", "汉庭");
        let mut dialogue = IndexMap::new();
        for i in 0..16 {
            let pred = if i < hits { gold.clone() } else { wrong.clone() };
            let record = TurnRecord {
                preds: vec![pred],
                labels: vec![gold.clone()],
                belief_state: vec![gold.clone()],
            };
            dialogue.insert(i.to_string(), record);
        }
        let mut output = ModelOutput::new();
        output.insert("1".to_string(), dialogue);
        eval_metrics(&output).unwrap().metrics.joint_goal
    }

    #[test]
    fn exact_ties_round_to_even() {
        assert_eq!(joint_goal_over_sixteen_turns(1), 0.062);
        assert_eq!(joint_goal_over_sixteen_turns(3), 0.188);
        assert_eq!(joint_goal_over_sixteen_turns(5), 0.312);
        assert_eq!(joint_goal_over_sixteen_turns(16), 1.0);
    }

    #[test]
    fn request_triples_are_reported_separately() {
        let request = t("餐馆-电话", "Request", "电话");
        let record = TurnRecord {
            preds: vec![request.clone()],
            labels: vec![request.clone()],
            belief_state: vec![],
        };
        let (score, inspection) = score_turn(&record);
        assert!(score.request && score.inform && score.joint_goal);
        assert_eq!(inspection.pred_request, vec![request.clone()]);
        assert_eq!(inspection.gold_request, vec![request]);
        assert!(inspection.pred_inform.is_empty());
    }

    #[test]
    fn empty_output_is_an_error() {
        let err = eval_metrics(&ModelOutput::new()).unwrap_err();
        assert!(matches!(err, DstError::NoTurns));

        let mut only_empty_dialogues = ModelOutput::new();
        only_empty_dialogues.insert("1".to_string(), IndexMap::new());
        assert!(matches!(
            eval_metrics(&only_empty_dialogues),
            Err(DstError::NoTurns)
        ));
    }

    #[test]
    fn parses_model_output_json() {
        let json = r#"{
            "1": {
                "0": {
                    "preds": [["餐馆-名称", "名称", "海底捞"]],
                    "labels": [["餐馆-名称", "名称", "海底捞"]],
                    "belief_state": [["餐馆-名称", "名称", "海底捞"]],
                    "context": "ignored"
                }
            }
        }"#;
        let output: ModelOutput = serde_json::from_str(json).unwrap();
        let report = eval_metrics(&output).unwrap();
        assert_eq!(report.metrics.joint_goal, 1.0);
    }
}
