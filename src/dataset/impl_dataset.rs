use super::{Dataset, DatasetBase, DatasetView, Float, Records};
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayBase, Data, Ix2};

impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase { records, targets }
    }

    /// Return references to the records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Return references to the targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Replace the records of the dataset, keeping the targets
    pub fn with_records<S: Records>(self, records: S) -> DatasetBase<S, T> {
        DatasetBase {
            records,
            targets: self.targets,
        }
    }
}

impl<F: Float> Dataset<F> {
    /// Build a point set from ragged rows
    ///
    /// Every row is one point. All rows must have the same, non-zero, length; the first row sets
    /// the dimensionality.
    ///
    /// ```
    /// use capball::Dataset;
    ///
    /// let dataset = Dataset::from_rows(&[vec![0., 0.], vec![2., 0.], vec![0., 2.]]).unwrap();
    /// assert_eq!(dataset.records().dim(), (3, 2));
    ///
    /// assert!(Dataset::from_rows(&[vec![0., 0.], vec![1.]]).is_err());
    /// ```
    pub fn from_rows<V: AsRef<[F]>>(rows: &[V]) -> Result<Dataset<F>> {
        let nfeatures = match rows.first() {
            Some(row) => row.as_ref().len(),
            None => return Err(Error::NotEnoughSamples),
        };

        let mut flat = Vec::with_capacity(rows.len() * nfeatures);
        for (row, point) in rows.iter().enumerate() {
            let point = point.as_ref();
            if point.len() != nfeatures {
                return Err(Error::DimensionMismatch {
                    row,
                    expected: nfeatures,
                    found: point.len(),
                });
            }
            flat.extend_from_slice(point);
        }

        let records = Array2::from_shape_vec((rows.len(), nfeatures), flat)?;

        Ok(DatasetBase::new(records, ()))
    }

    /// Create a read only view of the dataset
    pub fn view(&self) -> DatasetView<'_, F> {
        DatasetBase::new(self.records.view(), ())
    }
}

impl<F: Float, D: Data<Elem = F>> From<ArrayBase<D, Ix2>> for DatasetBase<ArrayBase<D, Ix2>, ()> {
    fn from(records: ArrayBase<D, Ix2>) -> Self {
        DatasetBase {
            records,
            targets: (),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::{Dataset, DatasetBase, Records};
    use ndarray::array;

    #[test]
    fn from_rows_builds_matrix() {
        let dataset = Dataset::from_rows(&[[0., 1.], [2., 3.], [4., 5.]]).unwrap();

        assert_eq!(dataset.records(), &array![[0., 1.], [2., 3.], [4., 5.]]);
        assert_eq!(dataset.nsamples(), 3);
        assert_eq!(dataset.nfeatures(), 2);
    }

    #[test]
    fn from_rows_rejects_ragged_points() {
        let res = Dataset::<f64>::from_rows(&[vec![0., 1.], vec![2., 3.], vec![4.]]);

        assert!(matches!(
            res,
            Err(Error::DimensionMismatch {
                row: 2,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn from_rows_rejects_empty_input() {
        let rows: Vec<Vec<f32>> = Vec::new();

        assert!(matches!(
            Dataset::from_rows(&rows),
            Err(Error::NotEnoughSamples)
        ));
    }

    #[test]
    fn views_share_records() {
        let dataset = DatasetBase::from(array![[1., 1.], [3., 3.]]);
        let view = dataset.view();

        assert_eq!(view.nsamples(), 2);
        assert_eq!(view.records()[[1, 0]], 3.);
    }
}
