use csv::Writer;
use serde::Serialize;

use crate::disc::basis::raviart_thomas::{RTElement, RTFunctionType};
use crate::disc::geometric::Edge;
use crate::error::Result;

#[derive(Serialize)]
struct NodeData {
    index: usize,
    r: f64,
    s: f64,
    location: &'static str,
    direction_r: f64,
    direction_s: f64,
}

/// One row per RT node: coordinates, the owning edge (or interior) and the DOF direction.
pub fn write_nodes_to_csv(element: &RTElement, filename: &str) -> Result<()> {
    let mut writer = Writer::from_path(filename)?;
    for index in 0..element.np {
        let direction = element.basis_vector_at(index)?;
        let location = match element.function_type(index)? {
            RTFunctionType::Interior => "interior",
            RTFunctionType::Edge(Edge::One) => "edge1",
            RTFunctionType::Edge(Edge::Two) => "edge2",
            RTFunctionType::Edge(Edge::Three) => "edge3",
        };
        let data = NodeData {
            index,
            r: element.r[index],
            s: element.s[index],
            location,
            direction_r: direction[0],
            direction_s: direction[1],
        };
        writer.serialize(data)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::basis::raviart_thomas::RTBasisType;

    #[test]
    fn test_write_nodes() {
        let element = RTElement::new(1, RTBasisType::RomeroJameson).unwrap();
        let path = std::env::temp_dir().join("dfr_reference_element_rt_nodes.csv");
        let filename = path.to_str().unwrap();
        write_nodes_to_csv(&element, filename).unwrap();
        let mut reader = csv::Reader::from_path(filename).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "index");
        assert_eq!(&headers[3], "location");
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), element.np);
        assert_eq!(&rows[0][3], "interior");
        assert_eq!(&rows[element.np - 1][3], "edge3");
        std::fs::remove_file(path).unwrap();
    }
}
