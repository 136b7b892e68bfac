//! Wire-and-box circuit diagrams.

use std::collections::HashMap;

use crate::draw::{self, INK, SERIES_BLUE, SERIES_ORANGE};
use crate::error::RenderResult;
use qlab_ir::{Circuit, Instruction, QubitId};

const WIRE_SPACING: i32 = 48;
const LAYER_SPACING: i32 = 56;
const BOX: i32 = 28;
const MARGIN: i32 = 32;

/// Render a circuit as a PNG diagram: one horizontal wire per qubit, gates
/// as boxes placed at their schedule layer, multi-qubit gates joined by a
/// vertical connector with a filled control dot.
pub fn circuit_diagram(circuit: &Circuit) -> RenderResult<Vec<u8>> {
    let num_qubits = circuit.num_qubits().max(1) as i32;
    let layers = layer_instructions(circuit);
    let num_layers = layers.len().max(1) as i32;

    let width = (MARGIN * 2 + num_layers * LAYER_SPACING) as u32;
    let height = (MARGIN * 2 + num_qubits * WIRE_SPACING) as u32;
    let mut img = draw::canvas(width, height);

    // Qubit wires
    for q in 0..num_qubits {
        let y = wire_y(q);
        draw::line(
            &mut img,
            MARGIN,
            y,
            width as i32 - MARGIN,
            y,
            INK,
        );
    }

    // Gates, layer by layer
    for (layer_idx, layer) in layers.iter().enumerate() {
        let cx = MARGIN + LAYER_SPACING / 2 + layer_idx as i32 * LAYER_SPACING;
        for instruction in layer {
            draw_instruction(&mut img, instruction, cx);
        }
    }

    Ok(draw::encode_png(&img)?)
}

fn wire_y(qubit: i32) -> i32 {
    MARGIN + WIRE_SPACING / 2 + qubit * WIRE_SPACING
}

fn draw_instruction(img: &mut image::RgbaImage, instruction: &Instruction, cx: i32) {
    let qubits: Vec<i32> = instruction.qubits.iter().map(|q| q.0 as i32).collect();

    if qubits.len() > 1 {
        // Vertical connector across the spanned wires
        let y_min = qubits.iter().map(|q| wire_y(*q)).min().unwrap_or(0);
        let y_max = qubits.iter().map(|q| wire_y(*q)).max().unwrap_or(0);
        draw::line(img, cx, y_min, cx, y_max, INK);

        // Controls are dots, the last operand gets the box
        for q in &qubits[..qubits.len() - 1] {
            let y = wire_y(*q);
            draw::fill_rect(img, cx - 4, y - 4, 8, 8, INK);
        }
        let target_y = wire_y(*qubits.last().expect("multi-qubit gate has operands"));
        gate_box(img, cx, target_y, SERIES_ORANGE);
    } else {
        gate_box(img, cx, wire_y(qubits[0]), SERIES_BLUE);
    }
}

fn gate_box(img: &mut image::RgbaImage, cx: i32, cy: i32, color: image::Rgba<u8>) {
    draw::fill_rect(img, cx - BOX / 2, cy - BOX / 2, BOX, BOX, color);
    draw::stroke_rect(img, cx - BOX / 2, cy - BOX / 2, BOX, BOX, INK);
}

/// Group instructions into schedule layers (same rule as `Circuit::depth`).
fn layer_instructions(circuit: &Circuit) -> Vec<Vec<Instruction>> {
    let mut layers: Vec<Vec<Instruction>> = vec![];
    let mut qubit_depth: HashMap<QubitId, usize> = HashMap::new();

    for instruction in circuit.instructions() {
        let layer = instruction
            .qubits
            .iter()
            .map(|q| qubit_depth.get(q).copied().unwrap_or(0))
            .max()
            .unwrap_or(0);
        while layers.len() <= layer {
            layers.push(vec![]);
        }
        layers[layer].push(instruction.clone());
        for q in &instruction.qubits {
            qubit_depth.insert(*q, layer + 1);
        }
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_diagram_decodable() {
        let png = circuit_diagram(&Circuit::bell()).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        // Two layers wide, two wires tall.
        assert!(decoded.width() > decoded.height());
    }

    #[test]
    fn test_empty_circuit_renders() {
        let circuit = Circuit::with_size("empty", 1);
        assert!(circuit_diagram(&circuit).is_ok());
    }
}
