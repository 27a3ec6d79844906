mod perceptual;
